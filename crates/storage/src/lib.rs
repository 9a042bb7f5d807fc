//! Blob-store adapters for the Stitchbook record store
//!
//! The store persists exactly one JSON text blob per key through the
//! [`BlobStore`] trait: synchronous whole-value get/set/delete, no partial
//! writes, no transactions. Namespacing is carried by the store identifier an
//! adapter is constructed with, isolating the record document from other
//! blobs (e.g. session data) sharing the same underlying engine.
//!
//! Two implementations:
//! - [`MemoryBlobStore`]: `RwLock`-guarded map; the default test double and
//!   the reference semantics
//! - [`FileBlobStore`]: one file per key under a namespace directory, with
//!   write-temp-then-rename replacement

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use stitchbook_core::Result;

/// Synchronous whole-value blob storage.
///
/// The record store treats an absent key as "no document yet" and an
/// adapter-level read failure the same way, so `get` is infallible by
/// contract; only writes surface errors. `delete` is idempotent.
pub trait BlobStore: Send + Sync {
    /// Read the blob at `key`, or `None` when absent (or unreadable).
    fn get(&self, key: &str) -> Option<String>;

    /// Write the whole blob at `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `Error::Storage` (or `Error::Io`) when the write cannot be
    /// completed; a failed write must leave any previous value intact.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob at `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &str);

    /// True when a blob exists at `key`.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
