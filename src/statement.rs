//! Control statements and references to them.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};

/// A control-implementation statement read from one SSP document.
///
/// `control_id` is only unique within its `ssp_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "ssp")]
    pub ssp_id: String,
    #[serde(rename = "control")]
    pub control_id: String,
    pub text: String,
}

impl Statement {
    pub fn new(
        ssp_id: impl Into<String>,
        control_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            ssp_id: ssp_id.into(),
            control_id: control_id.into(),
            text: text.into(),
        }
    }
}

/// A raw record as produced by a statement source, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementRecord {
    pub control_id: Option<String>,
    pub text: Option<String>,
}

impl StatementRecord {
    pub fn new(control_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            control_id: Some(control_id.into()),
            text: Some(text.into()),
        }
    }

    /// Returns the name of the first missing required field, if any.
    ///
    /// A blank control id counts as missing; blank text does not.
    pub fn missing_field(&self) -> Option<&'static str> {
        match (&self.control_id, &self.text) {
            (None, _) => Some("control"),
            (Some(control), _) if control.trim().is_empty() => Some("control"),
            (_, None) => Some("text"),
            _ => None,
        }
    }

    /// Converts into a statement of `ssp_id`, or `None` when malformed.
    pub fn into_statement(self, ssp_id: &str) -> Option<Statement> {
        if self.missing_field().is_some() {
            return None;
        }
        match (self.control_id, self.text) {
            (Some(control_id), Some(text)) => Some(Statement {
                ssp_id: ssp_id.to_string(),
                control_id: control_id.trim().to_string(),
                text,
            }),
            _ => None,
        }
    }
}

/// Identity of a statement within the combined result.
///
/// Deduplication is by this triple, never by statement text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatementRef {
    #[serde(rename = "ssp")]
    pub ssp_id: String,
    #[serde(rename = "control")]
    pub control_id: String,
    pub catalog: Catalog,
}

impl StatementRef {
    pub fn new(ssp_id: impl Into<String>, control_id: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            ssp_id: ssp_id.into(),
            control_id: control_id.into(),
            catalog,
        }
    }
}
