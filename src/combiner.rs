//! Merging per-document results into one combined result.
//!
//! The combined result is a set-union keyed by statement identity
//! `(ssp_id, control_id, catalog)`, never by statement text. Merging is
//! therefore:
//!
//! - **commutative**: documents may be merged in any order
//! - **idempotent**: merging the same document twice changes nothing
//!
//! Statement text is retained separately, keyed by `(ssp_id, control_id)`,
//! so consumers can render it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::extractor::{ComponentResult, DocumentMetadata};
use crate::statement::StatementRef;

/// One component across all merged documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedComponent {
    pub catalogs: BTreeSet<Catalog>,
    pub statement_refs: BTreeSet<StatementRef>,
}

/// Summary of one merged document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub ssp_id: String,
    pub catalog: Catalog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub statements: usize,
    pub skipped_records: usize,
}

impl DocumentSummary {
    fn new(ssp_id: &str, metadata: &DocumentMetadata) -> Self {
        Self {
            ssp_id: ssp_id.to_string(),
            catalog: metadata.catalog,
            remarks: metadata.remarks.clone(),
            statements: metadata.statements,
            skipped_records: metadata.skipped_count(),
        }
    }
}

/// Components and their statement references across many SSP documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    #[serde(default)]
    pub documents: BTreeSet<DocumentSummary>,
    /// Canonical name → component
    #[serde(default)]
    pub components: BTreeMap<String, CombinedComponent>,
    /// ssp_id → control_id → statement texts
    #[serde(default)]
    pub texts: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl CombinedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one document's components under `ssp_id`.
    pub fn add_document(&mut self, ssp_id: &str, result: &ComponentResult) {
        self.documents
            .insert(DocumentSummary::new(ssp_id, &result.metadata));

        for (name, component) in &result.components {
            let combined = self.components.entry(name.clone()).or_default();
            combined.catalogs.insert(component.catalog);

            for statement in &component.statements {
                combined.statement_refs.insert(StatementRef::new(
                    ssp_id,
                    statement.control_id.clone(),
                    component.catalog,
                ));
                self.texts
                    .entry(ssp_id.to_string())
                    .or_default()
                    .entry(statement.control_id.clone())
                    .or_default()
                    .insert(statement.text.clone());
            }
        }

        debug!(
            ssp_id = %ssp_id,
            components = result.components.len(),
            "document merged"
        );
    }

    /// Unions another combined result into this one.
    pub fn merge(&mut self, other: &CombinedResult) {
        self.documents.extend(other.documents.iter().cloned());

        for (name, component) in &other.components {
            let combined = self.components.entry(name.clone()).or_default();
            combined.catalogs.extend(component.catalogs.iter().copied());
            combined
                .statement_refs
                .extend(component.statement_refs.iter().cloned());
        }

        for (ssp_id, controls) in &other.texts {
            let ours = self.texts.entry(ssp_id.clone()).or_default();
            for (control_id, texts) in controls {
                ours.entry(control_id.clone())
                    .or_default()
                    .extend(texts.iter().cloned());
            }
        }
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn get(&self, component: &str) -> Option<&CombinedComponent> {
        self.components.get(component)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Retained texts of a statement.
    pub fn texts_for(&self, ssp_id: &str, control_id: &str) -> Option<&BTreeSet<String>> {
        self.texts.get(ssp_id)?.get(control_id)
    }

    /// Statement references of a component with their retained texts.
    pub fn statements_for<'a>(
        &'a self,
        component: &str,
    ) -> impl Iterator<Item = (&'a StatementRef, Option<&'a BTreeSet<String>>)> + 'a {
        self.components
            .get(component)
            .into_iter()
            .flat_map(|combined| combined.statement_refs.iter())
            .map(move |reference| {
                (
                    reference,
                    self.texts_for(&reference.ssp_id, &reference.control_id),
                )
            })
    }

    /// Control ids of a component grouped by catalog, each with the SSPs
    /// that state it.
    pub fn controls_by_catalog(
        &self,
        component: &str,
    ) -> BTreeMap<Catalog, BTreeMap<&str, BTreeSet<&str>>> {
        let mut grouped: BTreeMap<Catalog, BTreeMap<&str, BTreeSet<&str>>> = BTreeMap::new();
        if let Some(combined) = self.components.get(component) {
            for reference in &combined.statement_refs {
                grouped
                    .entry(reference.catalog)
                    .or_default()
                    .entry(reference.control_id.as_str())
                    .or_default()
                    .insert(reference.ssp_id.as_str());
            }
        }
        grouped
    }
}

/// Accumulates documents into a [`CombinedResult`], one merge call per
/// document.
#[derive(Debug, Clone, Default)]
pub struct Combiner {
    result: CombinedResult,
}

impl Combiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes accumulation from an earlier, partial result.
    pub fn from_partial(result: CombinedResult) -> Self {
        Self { result }
    }

    pub fn merge(&mut self, ssp_id: &str, result: &ComponentResult) -> &mut Self {
        self.result.add_document(ssp_id, result);
        self
    }

    pub fn merge_combined(&mut self, other: &CombinedResult) -> &mut Self {
        self.result.merge(other);
        self
    }

    pub fn finish(self) -> CombinedResult {
        info!(
            documents = self.result.documents.len(),
            components = self.result.components.len(),
            "combined result finished"
        );
        self.result
    }
}

/// Combines per-document results, each paired with its SSP identifier.
pub fn combine<I, S>(results: I) -> CombinedResult
where
    I: IntoIterator<Item = (S, ComponentResult)>,
    S: AsRef<str>,
{
    let mut combiner = Combiner::new();
    for (ssp_id, result) in results {
        combiner.merge(ssp_id.as_ref(), &result);
    }
    combiner.finish()
}
