//! Record readers for SSP statement exports.
//!
//! Two layouts are supported:
//!
//! - **Delimited** (CSV or PSV): one statement per row, with configurable
//!   control-id and statement columns and a header-skip count. Rows are
//!   parsed with the `csv` crate, so quoted fields may contain delimiters
//!   and newlines. Empty lines are not rows.
//! - **JSON lines**: one `{"control": ..., "text": ...}` object per line.
//!
//! Readers never drop a row they cannot interpret; they emit a record with
//! the missing field unset so the extractor counts it as malformed.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use ssp_components::StatementRecord;
use tracing::{debug, warn};

use crate::control_id::normalize_control_id;
use crate::errors::{SourceError, SourceResult};

static CONTROL_THEN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(?s)(.*)$").expect("Invalid control/text regex"));

/// Produces raw statement records from source text.
pub trait RecordReader {
    fn read_records(&self, input: &str) -> Vec<StatementRecord>;

    /// Reads a file. Invalid UTF-8 sequences are replaced rather than
    /// rejected.
    fn read_path(&self, path: &Path) -> SourceResult<Vec<StatementRecord>> {
        let bytes = fs::read(path).map_err(|e| SourceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let records = self.read_records(&String::from_utf8_lossy(&bytes));
        debug!(path = %path.display(), records = records.len(), "source read");
        Ok(records)
    }
}

/// Reader for delimiter-separated rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedReader {
    delimiter: u8,
    control_id_col: usize,
    statement_col: usize,
    skip_lines: usize,
    /// Split single-field rows at the first whitespace run
    split_missing_delimiter: bool,
}

impl DelimitedReader {
    /// Comma-separated values, control id in column 0 and text in column 1.
    pub fn csv() -> Self {
        Self {
            delimiter: b',',
            control_id_col: 0,
            statement_col: 1,
            skip_lines: 0,
            split_missing_delimiter: false,
        }
    }

    /// Pipe-separated values.
    ///
    /// PSV exports sometimes lose the `|` on a row; such rows are split at
    /// the first whitespace instead.
    pub fn psv() -> Self {
        Self {
            delimiter: b'|',
            split_missing_delimiter: true,
            ..Self::csv()
        }
    }

    pub fn with_columns(mut self, control_id_col: usize, statement_col: usize) -> Self {
        self.control_id_col = control_id_col;
        self.statement_col = statement_col;
        self
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    fn record(&self, row: &[String]) -> StatementRecord {
        if self.split_missing_delimiter && row.len() == 1 {
            return match CONTROL_THEN_TEXT.captures(row[0].trim()) {
                Some(captures) => StatementRecord {
                    control_id: captures.get(1).map(|m| normalize_control_id(m.as_str())),
                    text: captures.get(2).map(|m| m.as_str().trim().to_string()),
                },
                None => StatementRecord {
                    control_id: Some(normalize_control_id(&row[0])),
                    text: None,
                },
            };
        }

        StatementRecord {
            control_id: row
                .get(self.control_id_col)
                .map(|field| normalize_control_id(field)),
            text: row
                .get(self.statement_col)
                .map(|field| field.trim().to_string()),
        }
    }
}

impl RecordReader for DelimitedReader {
    fn read_records(&self, input: &str) -> Vec<StatementRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input.as_bytes());

        let records: Vec<StatementRecord> = reader
            .records()
            .skip(self.skip_lines)
            .filter_map(|row| match row {
                Ok(row) => {
                    let fields: Vec<String> = row.iter().map(str::to_string).collect();
                    (!is_blank(&fields)).then(|| self.record(&fields))
                }
                Err(error) => {
                    warn!(%error, "unreadable delimited row");
                    Some(StatementRecord::default())
                }
            })
            .collect();
        records
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

/// Reader for one JSON object per line with `control` and `text` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonLinesReader {
    skip_lines: usize,
}

impl JsonLinesReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }
}

impl RecordReader for JsonLinesReader {
    fn read_records(&self, input: &str) -> Vec<StatementRecord> {
        input
            .lines()
            .enumerate()
            .skip(self.skip_lines)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| match serde_json::from_str::<Value>(line) {
                Ok(object) => StatementRecord {
                    control_id: object
                        .get("control")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    text: object.get("text").and_then(Value::as_str).map(str::to_string),
                },
                Err(error) => {
                    warn!(line = number + 1, %error, "unparseable JSON line");
                    StatementRecord::default()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pairs(records: &[StatementRecord]) -> Vec<(Option<&str>, Option<&str>)> {
        records
            .iter()
            .map(|r| (r.control_id.as_deref(), r.text.as_deref()))
            .collect()
    }

    #[test]
    fn test_csv_basic() {
        let records = DelimitedReader::csv().read_records("AC-2,Accounts use AD.\nAC-3,Okta.\n");
        assert_eq!(
            pairs(&records),
            vec![
                (Some("AC-2"), Some("Accounts use AD.")),
                (Some("AC-3"), Some("Okta.")),
            ]
        );
    }

    #[test]
    fn test_csv_quoted_fields() {
        let input = "\"AC-2\",\"Accounts, groups and \"\"roles\"\"\nlive in AD.\"\r\n";
        let records = DelimitedReader::csv().read_records(input);
        assert_eq!(
            pairs(&records),
            vec![(Some("AC-2"), Some("Accounts, groups and \"roles\"\nlive in AD."))]
        );
    }

    #[test]
    fn test_csv_quote_after_whitespace_is_literal() {
        let records = DelimitedReader::csv().read_records("AC-2,  \"Vault\" stores keys.\n");
        assert_eq!(
            pairs(&records),
            vec![(Some("AC-2"), Some("\"Vault\" stores keys."))]
        );
    }

    #[test]
    fn test_psv_quoted_field_keeps_pipes() {
        let records = DelimitedReader::psv().read_records("AC-2|\"AD | Okta\"\n");
        assert_eq!(pairs(&records), vec![(Some("AC-2"), Some("AD | Okta"))]);
    }

    #[test]
    fn test_csv_columns_and_skip_lines() {
        let input = "Text,Id\nUses AD.,[AC-2] part a\n";
        let records = DelimitedReader::csv()
            .with_columns(1, 0)
            .with_skip_lines(1)
            .read_records(input);
        assert_eq!(pairs(&records), vec![(Some("AC-2"), Some("Uses AD."))]);
    }

    #[test]
    fn test_csv_short_row_has_no_text() {
        let records = DelimitedReader::csv().read_records("AC-2\n");
        assert_eq!(pairs(&records), vec![(Some("AC-2"), None)]);
    }

    #[test]
    fn test_psv_with_and_without_delimiter() {
        let input = "AC-2 | Accounts use AD.\nAC-3 Access is enforced by Okta.\n\nlonely\n";
        let records = DelimitedReader::psv().read_records(input);
        assert_eq!(
            pairs(&records),
            vec![
                (Some("AC-2"), Some("Accounts use AD.")),
                (Some("AC-3"), Some("Access is enforced by Okta.")),
                (Some("lonely"), None),
            ]
        );
    }

    #[test]
    fn test_jsonl() {
        let input = concat!(
            "{\"control\": \"AC-2\", \"text\": \"Uses AD.\"}\n",
            "\n",
            "not json\n",
            "{\"control\": \"AC-3\"}\n",
        );
        let records = JsonLinesReader::new().read_records(input);
        assert_eq!(
            pairs(&records),
            vec![
                (Some("AC-2"), Some("Uses AD.")),
                (None, None),
                (Some("AC-3"), None),
            ]
        );
    }

    #[test]
    fn test_jsonl_skip_lines() {
        let input = "header\n{\"control\": \"AC-2\", \"text\": \"Uses AD.\"}\n";
        let records = JsonLinesReader::new().with_skip_lines(1).read_records(input);
        assert_eq!(pairs(&records), vec![(Some("AC-2"), Some("Uses AD."))]);
    }

    #[test]
    fn test_read_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "AC-2|Uses AD.").unwrap();

        let records = DelimitedReader::psv().read_path(file.path()).unwrap();
        assert_eq!(pairs(&records), vec![(Some("AC-2"), Some("Uses AD."))]);
    }

    #[test]
    fn test_read_missing_path() {
        let result = DelimitedReader::psv().read_path(Path::new("/nonexistent/ssp.psv"));
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}
