//! One-shot legacy migration
//!
//! Early releases persisted clients as a flat JSON array under a separate
//! key. `migrate_legacy` folds that list into the root document: records are
//! copied unless their ID is already present, the sequence counter is
//! re-derived from the merged IDs, and the legacy key is removed once the
//! copy is saved. An empty (or unreadable) legacy list is deleted outright.
//!
//! The operation is an explicit call made by application start-up — not an
//! import-time side effect — and is idempotent: running it with no legacy key
//! present is a cheap no-op, so it is safe on every launch.

use tracing::{info, warn};

use crate::document::{load_document, save_document};
use crate::sequence::ensure_next_seq;
use crate::store::LEGACY_KEY;
use stitchbook_core::{ClientRecord, Result};
use stitchbook_storage::BlobStore;

/// Migrate the legacy flat-array client list into the root document.
///
/// Returns the number of records copied. Safe to call on every startup.
///
/// # Errors
/// Only a failed document save surfaces; an absent or malformed legacy blob
/// never does.
pub fn migrate_legacy(adapter: &dyn BlobStore) -> Result<usize> {
    let Some(blob) = adapter.get(LEGACY_KEY) else {
        return Ok(0);
    };

    let legacy: Vec<ClientRecord> = match serde_json::from_str(&blob) {
        Ok(list) => list,
        Err(err) => {
            warn!(
                target: "stitchbook::store",
                %err,
                "legacy client list unreadable, discarding"
            );
            Vec::new()
        }
    };

    if legacy.is_empty() {
        adapter.delete(LEGACY_KEY);
        return Ok(0);
    }

    let mut doc = load_document(adapter);
    let mut copied = 0;
    for record in legacy {
        // Re-running after a partial earlier pass must not clobber records
        // the root document already holds
        if !doc.users.contains_key(&record.id) {
            doc.users.insert(record.id.clone(), record);
            copied += 1;
        }
    }
    doc.app_metadata.total_clients = doc.users.len() as u64;

    // Re-derive the counter from the merged IDs; the pre-migration counter
    // knows nothing about the legacy IDs just copied in
    doc.app_metadata.next_client_seq = None;
    ensure_next_seq(&mut doc);

    save_document(adapter, &doc)?;
    adapter.delete(LEGACY_KEY);

    info!(
        target: "stitchbook::store",
        copied,
        total = doc.app_metadata.total_clients,
        "migrated legacy client list"
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ROOT_KEY;
    use stitchbook_core::{MeasurementSet, RootDocument};
    use stitchbook_storage::MemoryBlobStore;

    fn legacy_record(id: &str, name: &str) -> ClientRecord {
        ClientRecord {
            id: id.to_string(),
            name: name.to_string(),
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: "2023-06-01T00:00:00.000Z".to_string(),
            updated_at: "2023-06-01T00:00:00.000Z".to_string(),
            measurements: MeasurementSet::default(),
        }
    }

    fn seed_legacy(adapter: &MemoryBlobStore, records: &[ClientRecord]) {
        adapter
            .set(LEGACY_KEY, &serde_json::to_string(records).unwrap())
            .unwrap();
    }

    #[test]
    fn test_no_legacy_key_is_a_no_op() {
        let adapter = MemoryBlobStore::new();
        assert_eq!(migrate_legacy(&adapter).unwrap(), 0);
        // nothing written either
        assert!(!adapter.contains(ROOT_KEY));
    }

    #[test]
    fn test_copies_records_and_deletes_legacy_key() {
        let adapter = MemoryBlobStore::new();
        seed_legacy(
            &adapter,
            &[legacy_record("n-1", "Ali"), legacy_record("n-4", "Sara")],
        );

        assert_eq!(migrate_legacy(&adapter).unwrap(), 2);
        assert!(!adapter.contains(LEGACY_KEY));

        let doc = load_document(&adapter);
        assert_eq!(doc.users.len(), 2);
        assert_eq!(doc.app_metadata.total_clients, 2);
        // counter repaired past the highest migrated ID
        assert_eq!(doc.app_metadata.next_client_seq, Some(5));
    }

    #[test]
    fn test_existing_ids_are_not_clobbered() {
        let adapter = MemoryBlobStore::new();
        let mut doc = RootDocument::initial();
        let mut kept = legacy_record("n-1", "Current Ali");
        kept.notes = Some("already migrated".to_string());
        doc.users.insert("n-1".to_string(), kept);
        doc.app_metadata.total_clients = 1;
        save_document(&adapter, &doc).unwrap();

        seed_legacy(
            &adapter,
            &[legacy_record("n-1", "Stale Ali"), legacy_record("n-2", "Sara")],
        );

        assert_eq!(migrate_legacy(&adapter).unwrap(), 1);
        let doc = load_document(&adapter);
        assert_eq!(doc.users["n-1"].name, "Current Ali");
        assert_eq!(doc.users["n-2"].name, "Sara");
    }

    #[test]
    fn test_running_twice_equals_running_once() {
        let adapter = MemoryBlobStore::new();
        seed_legacy(&adapter, &[legacy_record("n-1", "Ali")]);

        assert_eq!(migrate_legacy(&adapter).unwrap(), 1);
        let after_first = load_document(&adapter);

        assert_eq!(migrate_legacy(&adapter).unwrap(), 0);
        let after_second = load_document(&adapter);

        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_empty_legacy_list_is_deleted_outright() {
        let adapter = MemoryBlobStore::new();
        adapter.set(LEGACY_KEY, "[]").unwrap();
        assert_eq!(migrate_legacy(&adapter).unwrap(), 0);
        assert!(!adapter.contains(LEGACY_KEY));
    }

    #[test]
    fn test_unreadable_legacy_list_is_discarded() {
        let adapter = MemoryBlobStore::new();
        adapter.set(LEGACY_KEY, "{definitely not an array").unwrap();
        assert_eq!(migrate_legacy(&adapter).unwrap(), 0);
        assert!(!adapter.contains(LEGACY_KEY));
    }
}
