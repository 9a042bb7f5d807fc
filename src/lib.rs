//! Stitchbook — embedded single-document record store for measurement-book
//! apps
//!
//! Stitchbook keeps a tailor's client book in one JSON root document (client
//! records plus store metadata) behind a pluggable blob-store adapter, and
//! layers the interesting operations on top: sequential `n-<k>` ID
//! assignment, partial-patch deep merging, filtered/paginated querying,
//! measurement-shape coercion, and one-shot legacy migration.
//!
//! # Quick Start
//!
//! ```
//! use stitchbook::{ClientFields, ClientStore, FilterMode, PageRequest};
//!
//! let store = ClientStore::in_memory();
//!
//! // Fold in any pre-1.0 data, then use the store
//! store.migrate_legacy()?;
//!
//! let client = store.add_client(
//!     &ClientFields { name: "Ali Khan".into(), ..Default::default() },
//!     None,
//! )?;
//! assert_eq!(client.id, "n-1");
//!
//! let page = store.get_clients_page(&PageRequest::filtered("ali", FilterMode::Name));
//! assert_eq!(page.total, 1);
//! # Ok::<(), stitchbook::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`stitchbook_core`]: domain types, boundary input shapes, errors,
//!   validation rules
//! - [`stitchbook_storage`]: the [`BlobStore`] adapter trait with in-memory
//!   and on-disk implementations
//! - [`stitchbook_store`]: the [`ClientStore`] facade and its engines
//!   (document access, sequencing, coercion, querying, migration)

#![warn(missing_docs)]

pub use stitchbook_core::{
    validation, AppMetadata, ClientFields, ClientPatch, ClientRecord, CustomField,
    CustomFieldInput, CustomFieldsInput, EntryInput, Error, MeasurementEntry, MeasurementSet,
    MeasurementsInput, NumberOrText, Result, RootDocument, Slot, DATA_VERSION,
};
pub use stitchbook_storage::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use stitchbook_store::{
    coerce_measurements, ClientStore, FilterMode, PageRequest, PageResult, StoreStatistics,
    LEGACY_KEY, ROOT_KEY,
};
