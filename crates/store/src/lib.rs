//! The Stitchbook record store
//!
//! ## Design: SNAPSHOT PER CALL
//!
//! [`ClientStore`] holds only an injected `Arc<dyn BlobStore>`. No caches, no
//! long-lived document reference: every operation loads the full root
//! document from the adapter, mutates an in-memory copy, and writes the whole
//! document back in a single `set`. There is no partial write.
//!
//! ## Concurrency
//!
//! Single logical writer by construction. Read-modify-write is not atomic
//! across the adapter boundary, so callers must let each operation complete
//! before dispatching the next; the store adds no locking of its own.
//!
//! ## Modules
//!
//! - `document`: load (with default fallback) / save of the root document
//! - `sequence`: `n-<k>` ID assignment with self-repair
//! - `coerce`: normalization of heterogeneous measurement payloads
//! - `query`: filter / sort / paginate engine
//! - `migrate`: one-shot legacy flat-array migration
//! - `store`: the `ClientStore` facade tying it all together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coerce;
pub mod document;
pub mod migrate;
pub mod query;
pub mod sequence;
pub mod store;

pub use coerce::coerce_measurements;
pub use query::{FilterMode, PageRequest, PageResult};
pub use store::{ClientStore, StoreStatistics, LEGACY_KEY, ROOT_KEY};
