//! Core error types for achievemore-core.
//!
//! Validation failures are returned to the caller with a message that can be
//! shown to the user as-is. Persistence failures are reported through the
//! notification sink and never abort an in-memory mutation. Operations on
//! unknown ids are silent no-ops and have no error variant.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for achievemore-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot store could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors outside the snapshot store (e.g. export)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
///
/// The `Display` output is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task submitted without a due date
    #[error("Please set a due date and time.")]
    MissingDueDate,

    /// Blank title or name
    #[error("{field} must not be empty.")]
    Empty { field: &'static str },

    /// Value outside its allowed range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Snapshot store errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to read the snapshot
    #[error("Failed to read snapshot from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the snapshot
    #[error("Failed to write snapshot to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored blob is not a valid snapshot
    #[error("Saved data is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Snapshot could not be encoded
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Store refuses writes (used by in-memory stores)
    #[error("Store is read-only")]
    ReadOnly,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
