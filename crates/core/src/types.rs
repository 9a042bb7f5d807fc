//! Canonical persisted types for the Stitchbook record store
//!
//! This module defines the single persisted unit (`RootDocument`) and
//! everything it contains:
//! - `ClientRecord`: one person's contact info plus measurement set
//! - `MeasurementSet`: nine fixed slots plus a map of user-named custom fields
//! - `AppMetadata`: document-level bookkeeping (client count, backup stamp,
//!   sequence counter)
//!
//! All types serialize to JSON via serde; optional fields are skipped when
//! absent so a field that was never set is literally missing from the blob
//! ("absence over empty"). That policy is what makes partial-patch merging
//! safe: a patch that did not touch a field does not mention it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Schema version stamped into `AppMetadata.data_version`.
pub const DATA_VERSION: &str = "1.0";

// ============================================================================
// Measurement slots
// ============================================================================

/// The fixed measurement slots.
///
/// A closed enumeration: the canonical Western-garment set. Each variant maps
/// to one named key in the persisted `measurements` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Chest circumference
    Chest,
    /// Shoulder width
    Shoulder,
    /// Arm length
    ArmLength,
    /// Collar circumference
    Collar,
    /// Shirt length
    ShirtLength,
    /// Waist circumference
    Waist,
    /// Hip circumference
    Hips,
    /// Trouser length
    TrouserLength,
    /// Inseam length
    Inseam,
}

impl Slot {
    /// Every fixed slot, in persisted order.
    pub const ALL: [Slot; 9] = [
        Slot::Chest,
        Slot::Shoulder,
        Slot::ArmLength,
        Slot::Collar,
        Slot::ShirtLength,
        Slot::Waist,
        Slot::Hips,
        Slot::TrouserLength,
        Slot::Inseam,
    ];

    /// The key this slot uses in the persisted JSON object.
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Chest => "chest",
            Slot::Shoulder => "shoulder",
            Slot::ArmLength => "arm_length",
            Slot::Collar => "collar",
            Slot::ShirtLength => "shirt_length",
            Slot::Waist => "waist",
            Slot::Hips => "hips",
            Slot::TrouserLength => "trouser_length",
            Slot::Inseam => "inseam",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Measurement entries
// ============================================================================

/// One measurement value with optional free-text notes.
///
/// An entry that carries neither a value nor notes is never persisted; it is
/// simply absent from its slot or map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    /// Numeric value in the caller's preferred unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MeasurementEntry {
    /// Entry with a value and empty notes, as used for slot defaults.
    pub fn zeroed() -> Self {
        Self {
            value: Some(0.0),
            notes: Some(String::new()),
        }
    }

    /// True when the entry carries neither a value nor non-empty notes.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.notes.as_deref().map_or(true, str::is_empty)
    }
}

/// A user-named measurement beyond the fixed slots.
///
/// Persisted under an opaque stable key so the field can be renamed or edited
/// in place without re-keying an ordered list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    /// Display name chosen by the user
    pub name: String,
    /// Numeric value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The full measurement shape carried by every client record.
///
/// Each fixed slot is optional; `custom_fields` is a map keyed by a stable
/// identifier. Both properties exist so that partial patches can deep-merge
/// without clobbering untouched entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    /// Chest slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<MeasurementEntry>,
    /// Shoulder slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoulder: Option<MeasurementEntry>,
    /// Arm length slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm_length: Option<MeasurementEntry>,
    /// Collar slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collar: Option<MeasurementEntry>,
    /// Shirt length slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shirt_length: Option<MeasurementEntry>,
    /// Waist slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<MeasurementEntry>,
    /// Hips slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<MeasurementEntry>,
    /// Trouser length slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trouser_length: Option<MeasurementEntry>,
    /// Inseam slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inseam: Option<MeasurementEntry>,
    /// User-named fields beyond the fixed slots, keyed by stable identifier
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, CustomField>,
}

impl MeasurementSet {
    /// The full default set: every fixed slot present and zeroed, no custom
    /// fields. Used as the base when materializing a new client record.
    pub fn defaults() -> Self {
        let mut set = Self::default();
        for slot in Slot::ALL {
            set.set_slot(slot, MeasurementEntry::zeroed());
        }
        set
    }

    /// Borrow the entry for a fixed slot.
    pub fn slot(&self, slot: Slot) -> Option<&MeasurementEntry> {
        match slot {
            Slot::Chest => self.chest.as_ref(),
            Slot::Shoulder => self.shoulder.as_ref(),
            Slot::ArmLength => self.arm_length.as_ref(),
            Slot::Collar => self.collar.as_ref(),
            Slot::ShirtLength => self.shirt_length.as_ref(),
            Slot::Waist => self.waist.as_ref(),
            Slot::Hips => self.hips.as_ref(),
            Slot::TrouserLength => self.trouser_length.as_ref(),
            Slot::Inseam => self.inseam.as_ref(),
        }
    }

    /// Replace the entry for a fixed slot.
    pub fn set_slot(&mut self, slot: Slot, entry: MeasurementEntry) {
        let target = match slot {
            Slot::Chest => &mut self.chest,
            Slot::Shoulder => &mut self.shoulder,
            Slot::ArmLength => &mut self.arm_length,
            Slot::Collar => &mut self.collar,
            Slot::ShirtLength => &mut self.shirt_length,
            Slot::Waist => &mut self.waist,
            Slot::Hips => &mut self.hips,
            Slot::TrouserLength => &mut self.trouser_length,
            Slot::Inseam => &mut self.inseam,
        };
        *target = Some(entry);
    }

    /// Deep-merge a patch into this set.
    ///
    /// A slot present in the patch replaces the current slot wholesale; slots
    /// the patch does not mention are preserved. Custom fields merge
    /// per-entry: a patch that edits one custom field leaves unrelated keys
    /// untouched.
    pub fn merge_from(&mut self, patch: MeasurementSet) {
        for slot in Slot::ALL {
            if let Some(entry) = patch.slot(slot) {
                self.set_slot(slot, entry.clone());
            }
        }
        for (key, field) in patch.custom_fields {
            self.custom_fields.insert(key, field);
        }
    }

    /// Count of populated entries: non-empty fixed slots plus custom fields.
    pub fn populated_len(&self) -> usize {
        let slots = Slot::ALL
            .iter()
            .filter(|s| self.slot(**s).is_some_and(|e| !e.is_empty()))
            .count();
        slots + self.custom_fields.len()
    }
}

// ============================================================================
// Client records
// ============================================================================

/// One client: contact info plus measurements.
///
/// `id` has the form `n-<k>` and is assigned by the store, never by callers.
/// `created_at` is fixed at creation; `updated_at` refreshes on every
/// successful mutation. Both are RFC 3339 strings in the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Store-assigned identifier, `n-<positive integer>`, immutable
    pub id: String,
    /// Display name, non-empty after trim
    pub name: String,
    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-text notes about the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp, RFC 3339
    pub created_at: String,
    /// Last-mutation timestamp, RFC 3339
    pub updated_at: String,
    /// The client's measurement set
    #[serde(default)]
    pub measurements: MeasurementSet,
}

/// Payload for creating a client. The ID is assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientFields {
    /// Display name (required; validated upstream)
    pub name: String,
    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for an existing client.
///
/// `None` means "untouched" — there is no way to clear a contact field back
/// to absent through a patch; callers overwrite with a new value instead.
/// `id` and `created_at` are immutable and have no patch counterpart.
/// Measurements arrive in the raw boundary shape and are coerced before
/// merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// New email
    #[serde(default)]
    pub email: Option<String>,
    /// New address
    #[serde(default)]
    pub address: Option<String>,
    /// New notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Measurement patch in any accepted boundary shape
    #[serde(default)]
    pub measurements: Option<crate::input::MeasurementsInput>,
}

// ============================================================================
// Root document
// ============================================================================

/// Document-level bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Invariant: equals `users.len()` after every mutating operation
    #[serde(default)]
    pub total_clients: u64,
    /// RFC 3339 stamp of the last successful write, empty until first write
    #[serde(default)]
    pub last_backup: String,
    /// Schema version of the persisted document
    #[serde(default = "default_data_version")]
    pub data_version: String,
    /// Next number to use for `n-<k>` ID generation.
    ///
    /// Optional on the wire: documents written before sequence tracking (or
    /// hand-edited ones) omit it, and the sequencer repairs it from the
    /// existing IDs on first use. Monotonically non-decreasing; never
    /// decremented on delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_client_seq: Option<u64>,
}

fn default_data_version() -> String {
    DATA_VERSION.to_string()
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            total_clients: 0,
            last_backup: String::new(),
            data_version: default_data_version(),
            // None so that parsing a pre-sequence document triggers repair
            next_client_seq: None,
        }
    }
}

/// The single persisted unit: all client records plus metadata.
///
/// The store owns this document's whole lifecycle; every operation re-reads
/// it from the adapter, mutates an in-memory copy, and writes the whole
/// document back. There is no partial write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootDocument {
    /// Client records keyed by ID
    #[serde(default)]
    pub users: BTreeMap<String, ClientRecord>,
    /// Document-level bookkeeping
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

impl RootDocument {
    /// The fresh document used when nothing is persisted yet: no users,
    /// sequence counter starting at 1.
    pub fn initial() -> Self {
        Self {
            users: BTreeMap::new(),
            app_metadata: AppMetadata {
                next_client_seq: Some(1),
                ..AppMetadata::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_wire_names() {
        assert_eq!(Slot::Chest.as_str(), "chest");
        assert_eq!(Slot::ArmLength.as_str(), "arm_length");
        assert_eq!(Slot::TrouserLength.as_str(), "trouser_length");
        assert_eq!(Slot::ALL.len(), 9);
    }

    #[test]
    fn test_slot_display_matches_wire_name() {
        for slot in Slot::ALL {
            assert_eq!(slot.to_string(), slot.as_str());
        }
    }

    #[test]
    fn test_default_set_has_every_slot_zeroed() {
        let set = MeasurementSet::defaults();
        for slot in Slot::ALL {
            let entry = set.slot(slot).expect("slot present");
            assert_eq!(entry.value, Some(0.0));
            assert_eq!(entry.notes.as_deref(), Some(""));
        }
        assert!(set.custom_fields.is_empty());
    }

    #[test]
    fn test_empty_entry_is_empty() {
        assert!(MeasurementEntry::default().is_empty());
        assert!(MeasurementEntry {
            value: None,
            notes: Some(String::new()),
        }
        .is_empty());
        assert!(!MeasurementEntry {
            value: Some(1.0),
            notes: None,
        }
        .is_empty());
        assert!(!MeasurementEntry {
            value: None,
            notes: Some("snug fit".to_string()),
        }
        .is_empty());
    }

    #[test]
    fn test_merge_preserves_untouched_slots_and_custom_fields() {
        let mut current = MeasurementSet::default();
        current.set_slot(
            Slot::Waist,
            MeasurementEntry {
                value: Some(30.0),
                notes: None,
            },
        );
        current.custom_fields.insert(
            "sleeve".to_string(),
            CustomField {
                name: "Sleeve".to_string(),
                value: Some(10.0),
                notes: None,
            },
        );

        let mut patch = MeasurementSet::default();
        patch.set_slot(
            Slot::Chest,
            MeasurementEntry {
                value: Some(40.0),
                notes: None,
            },
        );

        current.merge_from(patch);

        assert_eq!(current.slot(Slot::Waist).unwrap().value, Some(30.0));
        assert_eq!(current.slot(Slot::Chest).unwrap().value, Some(40.0));
        assert_eq!(current.custom_fields["sleeve"].value, Some(10.0));
    }

    #[test]
    fn test_absent_fields_are_skipped_in_json() {
        let set = MeasurementSet::default();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "{}");

        let record = ClientRecord {
            id: "n-1".to_string(),
            name: "Ali".to_string(),
            phone: None,
            email: None,
            address: None,
            notes: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            measurements: MeasurementSet::default(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("phone"));
        assert!(!json.contains("email"));
    }

    #[test]
    fn test_pre_sequence_document_parses_without_counter() {
        let doc: RootDocument = serde_json::from_str(r#"{"users":{}}"#).unwrap();
        assert_eq!(doc.app_metadata.next_client_seq, None);
        assert_eq!(doc.app_metadata.data_version, DATA_VERSION);
    }

    #[test]
    fn test_initial_document_starts_sequence_at_one() {
        let doc = RootDocument::initial();
        assert_eq!(doc.app_metadata.next_client_seq, Some(1));
        assert_eq!(doc.app_metadata.total_clients, 0);
        assert!(doc.users.is_empty());
    }

    #[test]
    fn test_root_document_round_trip() {
        let mut doc = RootDocument::initial();
        doc.users.insert(
            "n-1".to_string(),
            ClientRecord {
                id: "n-1".to_string(),
                name: "Sara".to_string(),
                phone: Some("0321-7654321".to_string()),
                email: None,
                address: None,
                notes: None,
                created_at: "2024-01-01T00:00:00.000Z".to_string(),
                updated_at: "2024-01-02T00:00:00.000Z".to_string(),
                measurements: MeasurementSet::defaults(),
            },
        );
        doc.app_metadata.total_clients = 1;

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: RootDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_populated_len_counts_non_empty_entries() {
        let mut set = MeasurementSet::default();
        assert_eq!(set.populated_len(), 0);

        set.set_slot(
            Slot::Chest,
            MeasurementEntry {
                value: Some(40.0),
                notes: None,
            },
        );
        set.set_slot(Slot::Waist, MeasurementEntry::default()); // empty, not counted
        set.custom_fields.insert(
            "sleeve".to_string(),
            CustomField {
                name: "Sleeve".to_string(),
                value: Some(10.0),
                notes: None,
            },
        );
        assert_eq!(set.populated_len(), 2);
    }
}
