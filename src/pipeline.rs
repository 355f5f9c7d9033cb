//! Parallel extraction of many SSP documents.
//!
//! Each document is extracted independently on the rayon pool; only the
//! final fold into a [`CombinedResult`] is sequential. A document that fails
//! (for example with an unknown catalog) is reported in
//! [`PipelineOutcome::failures`] and leaves the other documents' results
//! untouched.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::combiner::{CombinedResult, Combiner};
use crate::config::ExtractionConfig;
use crate::errors::SspError;
use crate::extractor::DocumentExtractor;
use crate::matcher::PhraseMatcher;
use crate::specification::ComponentSpecification;
use crate::statement::StatementRecord;

/// One SSP document's raw records and the catalog they are read against.
#[derive(Debug, Clone)]
pub struct SspDocument {
    pub ssp_id: String,
    pub catalog: String,
    pub records: Vec<StatementRecord>,
}

impl SspDocument {
    pub fn new(
        ssp_id: impl Into<String>,
        catalog: impl Into<String>,
        records: Vec<StatementRecord>,
    ) -> Self {
        Self {
            ssp_id: ssp_id.into(),
            catalog: catalog.into(),
            records,
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub combined: CombinedResult,
    /// Documents that could not be extracted, by SSP identifier
    pub failures: Vec<(String, SspError)>,
}

impl PipelineOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extracts every document in parallel and combines the successes.
pub fn extract_and_combine(
    spec: &ComponentSpecification,
    config: &ExtractionConfig,
    documents: &[SspDocument],
) -> PipelineOutcome {
    let matcher = PhraseMatcher::new(spec);
    let extractor = DocumentExtractor::new(&matcher).with_config(config.clone());

    let results: Vec<_> = documents
        .par_iter()
        .map(|document| {
            let result = extractor.extract_records(
                &document.ssp_id,
                document.records.iter().cloned(),
                &document.catalog,
            );
            (document.ssp_id.clone(), result)
        })
        .collect();

    let mut combiner = Combiner::new();
    let mut failures = Vec::new();
    for (ssp_id, result) in results {
        match result {
            Ok(result) => {
                combiner.merge(&ssp_id, &result);
            }
            Err(error) => {
                warn!(ssp_id = %ssp_id, %error, "document extraction failed");
                failures.push((ssp_id, error));
            }
        }
    }

    let combined = combiner.finish();
    info!(
        documents = documents.len(),
        failed = failures.len(),
        components = combined.len(),
        "pipeline finished"
    );
    PipelineOutcome { combined, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::statement::StatementRef;

    fn spec() -> ComponentSpecification {
        ComponentSpecification::from_json_str(
            r#"{"components": {"Active Directory": {"aka": ["AD"]}}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_failed_document_does_not_corrupt_others() {
        let documents = vec![
            SspDocument::new(
                "SSP1",
                "NIST_SP-800-171_rev1",
                vec![StatementRecord::new("3.1.1", "AD limits access.")],
            ),
            SspDocument::new(
                "SSP2",
                "ISO_27001",
                vec![StatementRecord::new("A.9", "AD again.")],
            ),
        ];

        let outcome = extract_and_combine(&spec(), &ExtractionConfig::default(), &documents);

        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "SSP2");
        assert!(matches!(
            outcome.failures[0].1,
            SspError::UnknownCatalog { .. }
        ));

        let refs = &outcome.combined.get("Active Directory").unwrap().statement_refs;
        assert_eq!(
            refs.iter().collect::<Vec<_>>(),
            vec![&StatementRef::new("SSP1", "3.1.1", Catalog::Nist800171Rev1)]
        );
    }

    #[test]
    fn test_matches_sequential_combine() {
        let documents: Vec<SspDocument> = (0..8)
            .map(|n| {
                SspDocument::new(
                    format!("SSP{}", n),
                    "NIST_SP-800-53_rev5",
                    vec![
                        StatementRecord::new("AC-2", "Accounts live in AD."),
                        StatementRecord::default(),
                    ],
                )
            })
            .collect();

        let outcome = extract_and_combine(&spec(), &ExtractionConfig::default(), &documents);
        assert!(outcome.is_complete());

        let matcher = PhraseMatcher::new(&spec());
        let extractor = DocumentExtractor::new(&matcher);
        let sequential = crate::combiner::combine(documents.iter().map(|document| {
            let result = extractor
                .extract_records(
                    &document.ssp_id,
                    document.records.clone(),
                    &document.catalog,
                )
                .unwrap();
            (document.ssp_id.clone(), result)
        }));

        assert_eq!(outcome.combined, sequential);
        assert!(outcome
            .combined
            .documents
            .iter()
            .all(|summary| summary.skipped_records == 1));
    }
}
