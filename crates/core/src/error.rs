//! Error types for the Stitchbook record store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Only `NotFound` (update on a missing ID) is expected to reach the UI as an
//! actionable failure; a malformed persisted document is recovered internally
//! by falling back to the default document and never surfaces here.

use std::io;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the record store
#[derive(Debug, Error)]
pub enum Error {
    /// Update targeted a client ID that does not exist
    #[error("client not found: {0}")]
    NotFound(String),

    /// Document could not be serialized for persistence, or caller-supplied
    /// import data could not be parsed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Adapter-level storage failure (e.g. disk write)
    #[error("storage error: {0}")]
    Storage(String),

    /// Client fields or measurement values violated validation rules
    #[error("invalid client data: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// I/O error from the disk adapter
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
