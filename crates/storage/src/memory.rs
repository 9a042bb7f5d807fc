//! In-memory blob store
//!
//! `RwLock`-guarded map keyed by blob key. Used as the default adapter in
//! tests and as the reference semantics for the trait: everything the disk
//! adapter does must be observationally equivalent to this.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::BlobStore;
use stitchbook_core::Result;

/// In-memory `BlobStore` implementation.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        self.blobs.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.blobs
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.blobs.write().remove(key);
    }

    fn contains(&self, key: &str) -> bool {
        self.blobs.read().contains_key(key)
    }
}
