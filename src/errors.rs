//! Error types for component extraction.
//!
//! Every variant carries enough context (offending name, document label,
//! record index) to diagnose the failure without re-running.

use thiserror::Error;

/// Errors that can occur while loading specifications, extracting
/// components, or loading configuration.
#[derive(Debug, Error)]
pub enum SspError {
    /// A canonical name or alias is defined under more than one component.
    #[error("ambiguous component name {name:?}: defined under both {first:?} and {second:?}")]
    Specification {
        name: String,
        first: String,
        second: String,
    },

    /// The specification document could not be parsed.
    #[error("invalid component specification document: {message}")]
    SpecificationDocument { message: String },

    /// Extraction was requested against a catalog outside the closed set.
    #[error("unknown catalog {catalog:?} for document {document}")]
    UnknownCatalog { catalog: String, document: String },

    /// A source record is missing a required field.
    #[error("malformed statement record {index} in document {document}: missing {field}")]
    MalformedStatement {
        document: String,
        index: usize,
        field: &'static str,
    },

    /// Error loading a configuration file.
    #[error("failed to load configuration: {path}: {message}")]
    Config { path: String, message: String },
}

/// Result type for component extraction operations.
pub type SspResult<T> = Result<T, SspError>;
