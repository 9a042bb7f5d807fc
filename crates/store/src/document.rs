//! Root document access
//!
//! The loader never fails: an absent blob means "no document yet" and a
//! malformed blob is consciously discarded in favor of the default document.
//! The parse failure is still modeled as an explicit `Result` internally (and
//! logged) so the recovery is visible and testable rather than an implicit
//! catch-and-ignore.

use tracing::warn;

use crate::store::ROOT_KEY;
use stitchbook_core::{Error, Result, RootDocument};
use stitchbook_storage::BlobStore;

/// Parse a persisted blob into a document.
///
/// Exposed separately from [`load_document`] so the malformed-blob path can
/// be exercised in isolation.
///
/// # Errors
/// Returns the underlying serde error when the blob is not a valid document.
pub fn parse_document(blob: &str) -> std::result::Result<RootDocument, serde_json::Error> {
    serde_json::from_str(blob)
}

/// Load the root document, falling back to the initial document when the
/// blob is absent or malformed. Never fails.
pub fn load_document(adapter: &dyn BlobStore) -> RootDocument {
    let Some(blob) = adapter.get(ROOT_KEY) else {
        return RootDocument::initial();
    };
    match parse_document(&blob) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(
                target: "stitchbook::store",
                %err,
                "malformed root document, falling back to defaults"
            );
            RootDocument::initial()
        }
    }
}

/// Serialize and persist the whole document in one adapter write.
///
/// # Errors
/// `Error::Serialization` when encoding fails, or the adapter's write error.
pub fn save_document(adapter: &dyn BlobStore, doc: &RootDocument) -> Result<()> {
    let blob = serde_json::to_string(doc).map_err(|e| Error::Serialization(e.to_string()))?;
    adapter.set(ROOT_KEY, &blob)
}
