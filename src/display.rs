//! Underlined rendering of component matches within a statement.
//!
//! ```text
//! Okta logs are shipped to Splunk Cloud.
//! ╰──╯Okta
//!                          ╰──────────╯Splunk
//! ```

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::matcher::ComponentMatch;

/// Renders a statement followed by one underline per match, labelled with
/// the canonical component name.
pub struct MatchDisplay<'a> {
    text: &'a str,
    matches: &'a [ComponentMatch],
}

impl<'a> MatchDisplay<'a> {
    pub fn new(text: &'a str, matches: &'a [ComponentMatch]) -> Self {
        Self { text, matches }
    }
}

fn underline(width: usize) -> String {
    match width {
        0 => String::new(),
        1 => "╰".to_string(),
        _ => format!("╰{}╯", "─".repeat(width - 2)),
    }
}

impl<'a> fmt::Display for MatchDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // single-byte replacements keep match offsets valid
        let flat: String = self
            .text
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        f.write_str(&flat)?;

        for found in self.matches {
            let span = match flat.get(found.span.clone()) {
                Some(span) => span,
                None => continue,
            };
            let indent = UnicodeWidthStr::width(&flat[..found.span.start]);
            write!(
                f,
                "\n{}{}{}",
                " ".repeat(indent),
                underline(UnicodeWidthStr::width(span)),
                found.canonical_name
            )?;
        }
        Ok(())
    }
}
