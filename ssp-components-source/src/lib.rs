//! Statement sources for `ssp-components`.
//!
//! Turns SSP exports into raw [`StatementRecord`]s for the extractor. Records
//! are never validated here: a row missing its text becomes a record with
//! `text: None`, so the extractor can skip and count it.
//!
//! ## Modules
//!
//! - [`control_id`] - Control identifier normalization
//! - [`reader`] - Delimited (CSV/PSV) and JSON-lines readers
//! - [`config`] - Reader configuration via TOML
//! - [`errors`] - Error types for reading sources
//!
//! ## Example
//!
//! ```
//! use ssp_components_source::{DelimitedReader, RecordReader};
//!
//! let records = DelimitedReader::psv().read_records("AC-2 | Accounts are managed with AD.\n");
//! assert_eq!(records[0].control_id.as_deref(), Some("AC-2"));
//! ```
//!
//! [`StatementRecord`]: ssp_components::StatementRecord

pub mod config;
pub mod control_id;
pub mod errors;
pub mod reader;

pub use config::{ReaderConfig, SourceFormat};
pub use control_id::normalize_control_id;
pub use errors::{SourceError, SourceResult};
pub use reader::{DelimitedReader, JsonLinesReader, RecordReader};
