//! Reader configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{SourceError, SourceResult};
use crate::reader::{DelimitedReader, JsonLinesReader, RecordReader};

/// Layout of a statement source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    #[serde(rename = "csv")]
    Csv,
    #[default]
    #[serde(rename = "psv")]
    Psv,
    #[serde(rename = "json-l")]
    JsonLines,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Psv => "psv",
            SourceFormat::JsonLines => "json-l",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "psv" => Ok(SourceFormat::Psv),
            "json-l" => Ok(SourceFormat::JsonLines),
            _ => Err(SourceError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_statement_col() -> usize {
    1
}

/// How to read one SSP export, loadable from TOML:
///
/// ```toml
/// format = "csv"
/// control_id_col = 0
/// statement_col = 2
/// skip_lines = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    #[serde(default)]
    pub format: SourceFormat,
    /// Column holding the control id (delimited formats only)
    #[serde(default)]
    pub control_id_col: usize,
    /// Column holding the statement text (delimited formats only)
    #[serde(default = "default_statement_col")]
    pub statement_col: usize,
    /// Leading rows to skip, such as headers
    #[serde(default)]
    pub skip_lines: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            format: SourceFormat::default(),
            control_id_col: 0,
            statement_col: default_statement_col(),
            skip_lines: 0,
        }
    }
}

impl ReaderConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> SourceResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SourceError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SourceError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = format;
        self
    }

    /// Builds the reader this configuration describes.
    pub fn build(&self) -> Box<dyn RecordReader + Send + Sync> {
        match self.format {
            SourceFormat::Csv => Box::new(self.delimited(DelimitedReader::csv())),
            SourceFormat::Psv => Box::new(self.delimited(DelimitedReader::psv())),
            SourceFormat::JsonLines => {
                Box::new(JsonLinesReader::new().with_skip_lines(self.skip_lines))
            }
        }
    }

    fn delimited(&self, reader: DelimitedReader) -> DelimitedReader {
        reader
            .with_columns(self.control_id_col, self.statement_col)
            .with_skip_lines(self.skip_lines)
    }
}
