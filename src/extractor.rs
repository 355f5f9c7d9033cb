//! Per-document component extraction.
//!
//! A [`DocumentExtractor`] drives a [`Recognizer`] over every statement of one
//! SSP document and groups the statements by canonical component name. All
//! statements of one run share the run's catalog.
//!
//! Raw source records go through [`DocumentExtractor::extract_records`], which
//! skips malformed records and lists them in the result metadata rather than
//! aborting the document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::ExtractionConfig;
use crate::errors::{SspError, SspResult};
use crate::matcher::{PhraseMatcher, Recognizer};
use crate::specification::ComponentSpecification;
use crate::statement::{Statement, StatementRecord};

/// Statements referencing one component within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatements {
    pub catalog: Catalog,
    /// In first-seen order
    pub statements: Vec<Statement>,
}

/// A source record that was skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Zero-based position of the record in its source
    pub index: usize,
    pub reason: String,
}

/// Metadata describing one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// SSP identifier the statements came from
    #[serde(default)]
    pub source: Option<String>,
    pub catalog: Catalog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Number of statements scanned
    pub statements: usize,
    #[serde(default)]
    pub skipped: Vec<SkippedRecord>,
}

impl DocumentMetadata {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Components found in one SSP document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentResult {
    pub metadata: DocumentMetadata,
    /// Canonical name → statements
    pub components: BTreeMap<String, ComponentStatements>,
}

impl ComponentResult {
    fn empty(catalog: Catalog, source: Option<String>, remarks: Option<String>) -> Self {
        Self {
            metadata: DocumentMetadata {
                source,
                catalog,
                remarks,
                statements: 0,
                skipped: Vec::new(),
            },
            components: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.metadata.catalog
    }

    pub fn get(&self, component: &str) -> Option<&ComponentStatements> {
        self.components.get(component)
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn push(&mut self, component: &str, statement: Statement) {
        let catalog = self.metadata.catalog;
        self.components
            .entry(component.to_string())
            .or_insert_with(|| ComponentStatements {
                catalog,
                statements: Vec::new(),
            })
            .statements
            .push(statement);
    }
}

/// Extracts per-document component results using a [`Recognizer`].
#[derive(Debug, Clone)]
pub struct DocumentExtractor<'r, R: Recognizer + ?Sized = PhraseMatcher> {
    recognizer: &'r R,
    config: ExtractionConfig,
}

impl<'r, R: Recognizer + ?Sized> DocumentExtractor<'r, R> {
    pub fn new(recognizer: &'r R) -> Self {
        Self {
            recognizer,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Groups `statements` by the components mentioned in them.
    ///
    /// Fails only when `catalog` is not a recognized identifier; an empty
    /// statement sequence yields an empty result.
    pub fn extract<I>(&self, statements: I, catalog: &str) -> SspResult<ComponentResult>
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut statements = statements.into_iter().peekable();
        let source = statements.peek().map(|statement| statement.ssp_id.clone());
        let catalog = resolve_catalog(catalog, source.as_deref())?;

        let mut result = ComponentResult::empty(catalog, source, self.config.remarks.clone());
        for statement in statements {
            self.scan(&mut result, statement);
        }

        info!(
            source = result.metadata.source.as_deref().unwrap_or("<empty>"),
            catalog = %catalog,
            statements = result.metadata.statements,
            components = result.components.len(),
            "document extracted"
        );
        Ok(result)
    }

    /// Like [`extract`](Self::extract), for raw source records of `ssp_id`.
    ///
    /// Records missing a control id or text are skipped and listed in
    /// [`DocumentMetadata::skipped`].
    pub fn extract_records<I>(
        &self,
        ssp_id: &str,
        records: I,
        catalog: &str,
    ) -> SspResult<ComponentResult>
    where
        I: IntoIterator<Item = StatementRecord>,
    {
        let catalog = resolve_catalog(catalog, Some(ssp_id))?;

        let mut result = ComponentResult::empty(
            catalog,
            Some(ssp_id.to_string()),
            self.config.remarks.clone(),
        );
        for (index, record) in records.into_iter().enumerate() {
            if let Some(field) = record.missing_field() {
                let error = SspError::MalformedStatement {
                    document: ssp_id.to_string(),
                    index,
                    field,
                };
                warn!(%error, "skipping malformed statement record");
                result.metadata.skipped.push(SkippedRecord {
                    index,
                    reason: error.to_string(),
                });
                continue;
            }
            if let Some(statement) = record.into_statement(ssp_id) {
                self.scan(&mut result, statement);
            }
        }

        info!(
            source = ssp_id,
            catalog = %catalog,
            statements = result.metadata.statements,
            skipped = result.metadata.skipped_count(),
            components = result.components.len(),
            "document extracted"
        );
        Ok(result)
    }

    fn scan(&self, result: &mut ComponentResult, statement: Statement) {
        result.metadata.statements += 1;

        let mut components: Vec<String> = Vec::new();
        for found in self.recognizer.recognize(&statement.text) {
            if !components.contains(&found.canonical_name) {
                components.push(found.canonical_name);
            }
        }
        debug!(
            control = %statement.control_id,
            components = ?components,
            "statement scanned"
        );

        if components.is_empty() {
            if let Some(label) = &self.config.unmatched_label {
                result.push(label, statement);
            }
            return;
        }

        for component in &components {
            result.push(component, statement.clone());
        }
    }
}

fn resolve_catalog(catalog: &str, document: Option<&str>) -> SspResult<Catalog> {
    Catalog::from_id(catalog).ok_or_else(|| SspError::UnknownCatalog {
        catalog: catalog.to_string(),
        document: document.unwrap_or("<empty>").to_string(),
    })
}

/// Extracts the components of one document with a [`PhraseMatcher`] built
/// from `spec`.
pub fn extract<I>(
    statements: I,
    spec: &ComponentSpecification,
    catalog: &str,
) -> SspResult<ComponentResult>
where
    I: IntoIterator<Item = Statement>,
{
    let matcher = PhraseMatcher::new(spec);
    DocumentExtractor::new(&matcher).extract(statements, catalog)
}
