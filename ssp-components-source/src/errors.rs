//! Error types for reading statement sources.

use thiserror::Error;

/// Errors that can occur while configuring or reading a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file could not be read.
    #[error("failed to read source: {path}: {message}")]
    Io { path: String, message: String },

    /// The reader configuration could not be loaded.
    #[error("failed to load reader configuration: {path}: {message}")]
    Config { path: String, message: String },

    /// The requested format has no reader.
    #[error("unknown source format {format:?} (expected csv, psv or json-l)")]
    UnknownFormat { format: String },
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
