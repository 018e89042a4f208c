//! Error types for document loading and merge jobs.
//!
//! Provides a unified error type covering all failure modes: I/O,
//! serialization, unknown formats, configuration problems, and collision
//! count mismatches.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, writing, or merging documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension does not name a supported document format.
    #[error("unsupported document format '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    /// Failure tied to a specific input file.
    #[error("failed to load '{}': {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<LoadError>,
    },

    /// Merge configuration is unusable (e.g., no mixins listed).
    #[error("invalid merge configuration: {0}")]
    InvalidConfig(String),

    /// The merge produced a different number of collisions than expected.
    #[error("expected {expected} collision(s), found {actual}")]
    UnexpectedCollisions { expected: usize, actual: usize },
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
