//! Extraction configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{SspError, SspResult};

/// Configuration for a document extraction run, loadable from TOML:
///
/// ```toml
/// remarks = "Quarterly review"
/// unmatched_label = "UNKNOWN"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Free-form remarks recorded in each document's metadata.
    #[serde(default)]
    pub remarks: Option<String>,
    /// When set, statements matching no component are collected under this
    /// pseudo-component name instead of being dropped.
    #[serde(default)]
    pub unmatched_label: Option<String>,
}

impl ExtractionConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> SspResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SspError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SspError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_unmatched_label(mut self, label: impl Into<String>) -> Self {
        self.unmatched_label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config = ExtractionConfig::load(Path::new("/nonexistent/extraction.toml")).unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
remarks = "Quarterly review"
unmatched_label = "UNKNOWN"
"#
        )
        .unwrap();

        let config = ExtractionConfig::load(file.path()).unwrap();
        assert_eq!(config.remarks.as_deref(), Some("Quarterly review"));
        assert_eq!(config.unmatched_label.as_deref(), Some("UNKNOWN"));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "unmatched = true").unwrap();

        let result = ExtractionConfig::load(file.path());
        assert!(matches!(result, Err(SspError::Config { .. })));
    }

    #[test]
    fn test_builders() {
        let config = ExtractionConfig::default()
            .with_remarks("r")
            .with_unmatched_label("UNKNOWN");
        assert_eq!(config.remarks.as_deref(), Some("r"));
        assert_eq!(config.unmatched_label.as_deref(), Some("UNKNOWN"));
    }
}
