//! Control identifier normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static CONTROL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[?([\w.\-\\()]+)").expect("Invalid control id regex"));

/// Extracts a control identifier from a raw column value.
///
/// Takes everything up to the first whitespace and drops a wrapping `[`:
/// `"[AC-3 foo"` becomes `"AC-3"`. Values with no identifier characters are
/// returned trimmed.
pub fn normalize_control_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match CONTROL_ID.captures(trimmed).and_then(|captures| captures.get(1)) {
        Some(id) => id.as_str().trim().to_string(),
        None => trimmed.to_string(),
    }
}
