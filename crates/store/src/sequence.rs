//! Sequential `n-<k>` ID assignment
//!
//! IDs come from a persisted counter rather than a UUID: there is exactly one
//! local writer and no merge scenario, and `n-7` is something a user can read
//! over the phone. The counter is monotonically non-decreasing across the
//! document's lifetime — deletes never decrement it, so an ID is never reused
//! even after its record is gone.
//!
//! `ensure_next_seq` doubles as a repair pass: a document that predates
//! sequence tracking (or was hand-edited) gets its counter derived from the
//! existing IDs.

use stitchbook_core::RootDocument;

/// Prefix of every store-assigned client ID.
pub const ID_PREFIX: &str = "n-";

/// Parse the numeric part of an `n-<digits>` ID. Anything else is `None`.
pub fn parse_client_seq(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Format a sequence number as a client ID.
pub fn format_client_id(seq: u64) -> String {
    format!("{}{}", ID_PREFIX, seq)
}

/// Return the next sequence number, repairing the counter if needed.
///
/// When the persisted counter is a positive integer it is returned as-is.
/// Otherwise the counter is derived: `max` over all `n-<digits>` IDs plus
/// one, falling back to `|users| + 1` when no ID matches the pattern. The
/// derived value is written back into metadata as a repair side effect.
pub fn ensure_next_seq(doc: &mut RootDocument) -> u64 {
    if let Some(seq) = doc.app_metadata.next_client_seq {
        if seq > 0 {
            return seq;
        }
    }

    let max_seen = doc
        .users
        .keys()
        .filter_map(|id| parse_client_seq(id))
        .max()
        .unwrap_or(0);
    let seq = if max_seen > 0 {
        max_seen + 1
    } else {
        doc.users.len() as u64 + 1
    };
    doc.app_metadata.next_client_seq = Some(seq);
    seq
}

/// Advance the counter by one. Called once per successful add, after ID
/// assignment — never on update or delete.
pub fn bump_seq(doc: &mut RootDocument) {
    let cur = ensure_next_seq(doc);
    doc.app_metadata.next_client_seq = Some(cur + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchbook_core::{ClientRecord, MeasurementSet};

    fn record(id: &str) -> ClientRecord {
        ClientRecord {
            id: id.to_string(),
            name: "Client".to_string(),
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            measurements: MeasurementSet::default(),
        }
    }

    fn doc_with_ids(ids: &[&str]) -> RootDocument {
        let mut doc = RootDocument::initial();
        doc.app_metadata.next_client_seq = None;
        for id in ids {
            doc.users.insert(id.to_string(), record(id));
        }
        doc
    }

    #[test]
    fn test_parse_client_seq() {
        assert_eq!(parse_client_seq("n-7"), Some(7));
        assert_eq!(parse_client_seq("n-07"), Some(7));
        assert_eq!(parse_client_seq("n-"), None);
        assert_eq!(parse_client_seq("n-x"), None);
        assert_eq!(parse_client_seq("n-+3"), None);
        assert_eq!(parse_client_seq("m-3"), None);
        assert_eq!(parse_client_seq("7"), None);
    }

    #[test]
    fn test_valid_counter_is_returned_untouched() {
        let mut doc = RootDocument::initial();
        doc.app_metadata.next_client_seq = Some(42);
        assert_eq!(ensure_next_seq(&mut doc), 42);
        assert_eq!(doc.app_metadata.next_client_seq, Some(42));
    }

    #[test]
    fn test_missing_counter_is_derived_from_max_id() {
        let mut doc = doc_with_ids(&["n-3", "n-11", "n-7"]);
        assert_eq!(ensure_next_seq(&mut doc), 12);
        // repair is persisted back into metadata
        assert_eq!(doc.app_metadata.next_client_seq, Some(12));
    }

    #[test]
    fn test_zero_counter_triggers_repair() {
        let mut doc = doc_with_ids(&["n-5"]);
        doc.app_metadata.next_client_seq = Some(0);
        assert_eq!(ensure_next_seq(&mut doc), 6);
    }

    #[test]
    fn test_non_matching_ids_fall_back_to_count() {
        let mut doc = doc_with_ids(&["legacy-a", "legacy-b"]);
        assert_eq!(ensure_next_seq(&mut doc), 3);
    }

    #[test]
    fn test_mixed_ids_prefer_max_matching() {
        let mut doc = doc_with_ids(&["legacy-a", "n-2"]);
        assert_eq!(ensure_next_seq(&mut doc), 3);
    }

    #[test]
    fn test_empty_document_starts_at_one() {
        let mut doc = doc_with_ids(&[]);
        assert_eq!(ensure_next_seq(&mut doc), 1);
    }

    #[test]
    fn test_bump_increments_by_one() {
        let mut doc = RootDocument::initial();
        assert_eq!(ensure_next_seq(&mut doc), 1);
        bump_seq(&mut doc);
        assert_eq!(doc.app_metadata.next_client_seq, Some(2));
        bump_seq(&mut doc);
        assert_eq!(doc.app_metadata.next_client_seq, Some(3));
    }
}
