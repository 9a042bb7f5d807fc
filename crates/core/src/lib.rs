//! Core types for the Stitchbook record store
//!
//! This crate defines the foundational vocabulary shared by the storage and
//! store crates:
//! - The persisted document shape (`RootDocument`, `ClientRecord`,
//!   `MeasurementSet`)
//! - The boundary input shapes form layers produce (`MeasurementsInput` and
//!   friends), kept deliberately separate from the canonical types so the
//!   store never has to tolerate ambiguous shapes internally
//! - The error taxonomy (`Error`, `Result`)
//! - Field validation rules applied upstream of the store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod input;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use input::{
    CustomFieldInput, CustomFieldsInput, EntryInput, MeasurementsInput, NumberOrText,
};
pub use types::{
    AppMetadata, ClientFields, ClientPatch, ClientRecord, CustomField, MeasurementEntry,
    MeasurementSet, RootDocument, Slot, DATA_VERSION,
};
