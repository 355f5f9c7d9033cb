//! Component extraction and consolidation for System Security Plan (SSP)
//! control-implementation statements.
//!
//! Statements flow strictly forward through the crate:
//!
//! ```text
//! statements ─▶ PhraseMatcher ─▶ DocumentExtractor ─▶ Combiner ─▶ CombinedResult
//! ```
//!
//! ## Modules
//!
//! - [`specification`] - Known components, their aliases and exclusions
//! - [`matcher`] - Longest-match phrase matching over statement text
//! - [`extractor`] - Per-document component results
//! - [`combiner`] - Order-independent merge of many documents
//! - [`catalog`] - Recognized control catalogs
//! - [`display`] - Underlined rendering of matches for diagnostics
//! - [`pipeline`] - Parallel extraction of many SSPs
//!
//! ## Example
//!
//! ```
//! use ssp_components::{combine, extract, ComponentSpecification, Statement};
//!
//! let spec = ComponentSpecification::from_json_str(
//!     r#"{"components": {"Active Directory": {"aka": ["AD"]}}}"#,
//! )
//! .unwrap();
//!
//! let ssp1 = extract(
//!     vec![Statement::new("SSP1", "1.1", "Accounts are managed with AD.")],
//!     &spec,
//!     "NIST_SP-800-171_rev1",
//! )
//! .unwrap();
//!
//! let combined = combine(vec![("SSP1", ssp1)]);
//! assert_eq!(combined.component_names().collect::<Vec<_>>(), vec!["Active Directory"]);
//! ```

pub mod catalog;
pub mod combiner;
pub mod config;
pub mod display;
pub mod errors;
pub mod extractor;
pub mod matcher;
pub mod pipeline;
pub mod specification;
pub mod statement;
mod token;

pub use catalog::Catalog;
pub use combiner::{combine, CombinedComponent, CombinedResult, Combiner, DocumentSummary};
pub use config::ExtractionConfig;
pub use display::MatchDisplay;
pub use errors::{SspError, SspResult};
pub use extractor::{
    extract, ComponentResult, ComponentStatements, DocumentExtractor, DocumentMetadata,
    SkippedRecord,
};
pub use matcher::{match_statement, ComponentMatch, PhraseMatcher, Recognizer};
pub use pipeline::{extract_and_combine, PipelineOutcome, SspDocument};
pub use specification::{ComponentDocument, ComponentEntry, ComponentSpecification};
pub use statement::{Statement, StatementRecord, StatementRef};

#[cfg(test)]
mod tests {
    mod end_to_end;
    mod properties;
}
