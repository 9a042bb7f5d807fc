//! ClientStore: the record-store facade
//!
//! ## Design: STATELESS FACADE
//!
//! `ClientStore` holds only an injected `Arc<dyn BlobStore>`. All data lives
//! in the single root document behind [`ROOT_KEY`]; every operation is a full
//! load → mutate → save cycle with no cache in between.
//!
//! ## Bookkeeping invariants
//!
//! After every mutating operation: `total_clients == users.len()`,
//! `last_backup` carries the operation's timestamp, and the sequence counter
//! has moved only forward (bumped on add, untouched on update and delete).
//!
//! ## Error surface
//!
//! Only `NotFound` on update is an actionable failure for callers. Absence on
//! read is `None`, delete of a missing ID is a silent no-op, and a malformed
//! persisted document silently degrades to the default document.

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::coerce::coerce_measurements;
use crate::document::{load_document, save_document};
use crate::migrate::migrate_legacy;
use crate::query::{run_query, PageRequest, PageResult};
use crate::sequence::{bump_seq, ensure_next_seq, format_client_id};
use stitchbook_core::{
    ClientFields, ClientPatch, ClientRecord, Error, MeasurementSet, MeasurementsInput, Result,
    RootDocument,
};
use stitchbook_storage::{BlobStore, MemoryBlobStore};

/// Adapter key of the root document.
pub const ROOT_KEY: &str = "stitchbook_data";
/// Adapter key of the pre-1.0 flat-array client list.
pub const LEGACY_KEY: &str = "stitchbook_clients";

/// Counts reported by [`ClientStore::statistics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Number of client records
    pub total_clients: u64,
    /// Populated measurement entries across all clients (non-empty fixed
    /// slots plus custom fields)
    pub total_measurements: u64,
    /// RFC 3339 stamp of the last write, empty when nothing was written yet
    pub last_backup: String,
}

/// The client-record store.
///
/// # Example
///
/// ```
/// use stitchbook_store::ClientStore;
/// use stitchbook_core::ClientFields;
///
/// let store = ClientStore::in_memory();
/// let client = store
///     .add_client(
///         &ClientFields { name: "Ali Khan".into(), ..Default::default() },
///         None,
///     )
///     .unwrap();
/// assert_eq!(client.id, "n-1");
/// ```
#[derive(Clone)]
pub struct ClientStore {
    adapter: Arc<dyn BlobStore>,
}

impl ClientStore {
    /// Create a store over an injected adapter.
    pub fn new(adapter: Arc<dyn BlobStore>) -> Self {
        Self { adapter }
    }

    /// Convenience constructor over a fresh in-memory adapter.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBlobStore::new()))
    }

    /// The underlying adapter.
    pub fn adapter(&self) -> &Arc<dyn BlobStore> {
        &self.adapter
    }

    fn load(&self) -> RootDocument {
        load_document(self.adapter.as_ref())
    }

    fn save(&self, doc: &RootDocument) -> Result<()> {
        save_document(self.adapter.as_ref(), doc)
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    // ========== CRUD ==========

    /// Create a client with the next `n-<k>` ID.
    ///
    /// Incoming measurements (any accepted shape) are coerced and overlaid
    /// onto a full default set, so every fixed slot of a new record is
    /// present. String fields are trimmed; optional fields that trim to
    /// empty are dropped rather than stored as `""`. The returned record is
    /// the only way a caller learns the assigned ID.
    ///
    /// Name non-emptiness is enforced upstream by validation, not here.
    ///
    /// # Errors
    /// Only adapter write failures surface.
    pub fn add_client(
        &self,
        fields: &ClientFields,
        measurements: Option<&MeasurementsInput>,
    ) -> Result<ClientRecord> {
        let now = Self::now();
        let mut doc = self.load();

        let seq = ensure_next_seq(&mut doc);
        let id = format_client_id(seq);

        let mut set = MeasurementSet::defaults();
        if let Some(input) = measurements {
            set.merge_from(coerce_measurements(input));
        }

        let record = ClientRecord {
            id: id.clone(),
            name: fields.name.trim().to_string(),
            phone: trimmed_opt(fields.phone.as_deref()),
            email: trimmed_opt(fields.email.as_deref()),
            address: trimmed_opt(fields.address.as_deref()),
            notes: trimmed_opt(fields.notes.as_deref()),
            created_at: now.clone(),
            updated_at: now.clone(),
            measurements: set,
        };

        doc.users.insert(id.clone(), record.clone());
        doc.app_metadata.total_clients = doc.users.len() as u64;
        doc.app_metadata.last_backup = now;
        bump_seq(&mut doc);
        self.save(&doc)?;

        debug!(target: "stitchbook::store", id = %id, "added client");
        Ok(record)
    }

    /// Look up a client by ID. Absence is an expected, non-exceptional
    /// outcome and yields `None`.
    pub fn get_client_by_id(&self, id: &str) -> Option<ClientRecord> {
        self.load().users.get(id).cloned()
    }

    /// Every record, in map order. Callers needing a defined order use
    /// [`Self::get_clients_page`].
    pub fn get_all_clients(&self) -> Vec<ClientRecord> {
        self.load().users.into_values().collect()
    }

    /// Filtered, sorted, paginated slice of clients.
    pub fn get_clients_page(&self, req: &PageRequest) -> PageResult {
        run_query(self.get_all_clients(), req)
    }

    /// Patch-merge an update into an existing client.
    ///
    /// Scalar fields in the patch overwrite; measurements are coerced and
    /// deep-merged (patch wins per-slot and per-custom-field, untouched
    /// entries survive). `id` and `created_at` are immutable; `updated_at`
    /// refreshes.
    ///
    /// # Errors
    /// `Error::NotFound` when no client has this ID — unlike reads, an update
    /// targets an entity the caller believes exists.
    pub fn update_client(&self, id: &str, patch: &ClientPatch) -> Result<ClientRecord> {
        let now = Self::now();
        let mut doc = self.load();

        let mut record = doc
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(phone) = &patch.phone {
            record.phone = Some(phone.clone());
        }
        if let Some(email) = &patch.email {
            record.email = Some(email.clone());
        }
        if let Some(address) = &patch.address {
            record.address = Some(address.clone());
        }
        if let Some(notes) = &patch.notes {
            record.notes = Some(notes.clone());
        }
        if let Some(input) = &patch.measurements {
            record.measurements.merge_from(coerce_measurements(input));
        }
        record.updated_at = now.clone();

        doc.users.insert(id.to_string(), record.clone());
        doc.app_metadata.total_clients = doc.users.len() as u64;
        doc.app_metadata.last_backup = now;
        self.save(&doc)?;

        debug!(target: "stitchbook::store", id = %id, "updated client");
        Ok(record)
    }

    /// Remove a client. Deleting an absent ID is a silent no-op — double
    /// taps and UI retries must not error. The sequence counter is never
    /// decremented, so the freed ID is never reassigned.
    ///
    /// # Errors
    /// Only adapter write failures surface.
    pub fn delete_client(&self, id: &str) -> Result<()> {
        let mut doc = self.load();
        if doc.users.remove(id).is_none() {
            return Ok(());
        }

        doc.app_metadata.total_clients = doc.users.len() as u64;
        doc.app_metadata.last_backup = Self::now();
        self.save(&doc)?;

        debug!(target: "stitchbook::store", id = %id, "deleted client");
        Ok(())
    }

    // ========== Migration ==========

    /// Fold the legacy flat-array client list (if any) into the root
    /// document. Idempotent; intended to be called once at startup.
    ///
    /// # Errors
    /// Only a failed document save surfaces.
    pub fn migrate_legacy(&self) -> Result<usize> {
        migrate_legacy(self.adapter.as_ref())
    }

    // ========== Maintenance ==========

    /// Pretty-printed JSON of the whole document, for backup/sharing.
    ///
    /// # Errors
    /// `Error::Serialization` when encoding fails.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.load()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Replace the whole document with caller-supplied JSON.
    ///
    /// This is the one path where a parse failure surfaces: the caller
    /// supplied the bytes, so silently substituting defaults would destroy
    /// their data instead of protecting it.
    ///
    /// # Errors
    /// `Error::Serialization` when the input is not a valid document.
    pub fn import_json(&self, blob: &str) -> Result<()> {
        let mut doc: RootDocument = serde_json::from_str(blob)
            .map_err(|e| Error::Serialization(format!("invalid import data: {}", e)))?;
        doc.app_metadata.total_clients = doc.users.len() as u64;
        ensure_next_seq(&mut doc);
        self.save(&doc)
    }

    /// Reset to the default empty document.
    ///
    /// # Errors
    /// Only adapter write failures surface.
    pub fn clear_all(&self) -> Result<()> {
        self.save(&RootDocument::initial())
    }

    /// Counts over the current document.
    pub fn statistics(&self) -> StoreStatistics {
        let doc = self.load();
        let total_measurements = doc
            .users
            .values()
            .map(|c| c.measurements.populated_len() as u64)
            .sum();
        StoreStatistics {
            total_clients: doc.users.len() as u64,
            total_measurements,
            last_backup: doc.app_metadata.last_backup,
        }
    }
}

fn trimmed_opt(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
