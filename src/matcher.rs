//! Component mention matching over statement text.
//!
//! The [`PhraseMatcher`] finds every known canonical name or alias in a
//! statement, on whole-token boundaries and case-insensitively:
//!
//! - `"Managed via AD"` matches alias `"AD"`
//! - `"See the Advisory board"` does not, since `"AD"` is only part of a word
//!
//! # Overlaps
//!
//! When candidate phrases overlap, the longest phrase wins. Equal-length
//! overlaps go to an excluded name first, then to the lexically smallest
//! canonical name, then to the earliest start. Excluded names take part in
//! overlap resolution so that they claim their text, but they are never
//! emitted. Non-overlapping spans are kept independently.
//!
//! Each canonical component is reported at most once per statement, at its
//! first surviving span.

use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use tracing::warn;

use crate::specification::ComponentSpecification;
use crate::token::{key_tokens, tokenize, Token};

/// One component mention within a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMatch {
    pub canonical_name: String,
    /// Byte range of the matched phrase in the statement text
    pub span: Range<usize>,
}

/// Anything that can find component mentions in statement text.
///
/// [`PhraseMatcher`] is the rule-based implementation; a statistical
/// recognizer can plug into the extractor through the same seam.
pub trait Recognizer {
    fn recognize(&self, text: &str) -> Vec<ComponentMatch>;
}

impl<R: Recognizer + ?Sized> Recognizer for &R {
    fn recognize(&self, text: &str) -> Vec<ComponentMatch> {
        (**self).recognize(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PhraseTarget {
    /// Claims its text but emits nothing
    Excluded,
    Component(String),
}

#[derive(Debug, Clone)]
struct Phrase {
    /// Folded tokens after the first one
    remaining: Vec<String>,
    target: PhraseTarget,
}

/// A phrase occurrence found in the text, before overlap resolution.
#[derive(Debug)]
struct Occurrence<'p> {
    first_token: usize,
    last_token: usize,
    span: Range<usize>,
    chars: usize,
    target: &'p PhraseTarget,
}

impl<'p> Occurrence<'p> {
    fn overlaps(&self, other: &Occurrence<'_>) -> bool {
        self.first_token <= other.last_token && other.first_token <= self.last_token
    }

    /// Priority order: longest first, exclusions before components,
    /// lexically smallest canonical name, earliest start.
    fn priority(&self, other: &Occurrence<'_>) -> Ordering {
        (Reverse(self.chars), self.target, self.span.start).cmp(&(
            Reverse(other.chars),
            other.target,
            other.span.start,
        ))
    }
}

/// Dictionary matcher over the names of a [`ComponentSpecification`].
///
/// Phrases are keyed by their first folded token for O(1) candidate lookup,
/// then extended token by token.
#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    dictionary: HashMap<String, Vec<Phrase>>,
}

impl PhraseMatcher {
    /// Builds the phrase dictionary for a specification.
    pub fn new(spec: &ComponentSpecification) -> Self {
        let mut matcher = Self::default();
        for (name, canonical) in spec.names() {
            matcher.add(name, PhraseTarget::Component(canonical.to_string()));
        }
        for name in spec.excluded_names() {
            matcher.add(name, PhraseTarget::Excluded);
        }
        matcher
    }

    fn add(&mut self, key: &str, target: PhraseTarget) {
        let mut tokens = key_tokens(key).map(str::to_string);
        match tokens.next() {
            Some(first) => self.dictionary.entry(first).or_default().push(Phrase {
                remaining: tokens.collect(),
                target,
            }),
            None => warn!(key = %key, "component name has no tokens; skipping"),
        }
    }

    /// Number of phrases in the dictionary.
    pub fn len(&self) -> usize {
        self.dictionary.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    /// Finds component mentions in `text`, ordered by position.
    pub fn find(&self, text: &str) -> Vec<ComponentMatch> {
        let tokens = tokenize(text);
        let mut occurrences = self.occurrences(text, &tokens);
        occurrences.sort_by(|a, b| a.priority(b));

        let mut accepted: Vec<Occurrence<'_>> = Vec::new();
        for occurrence in occurrences {
            if accepted.iter().all(|kept| !kept.overlaps(&occurrence)) {
                accepted.push(occurrence);
            }
        }
        accepted.sort_by_key(|occurrence| occurrence.span.start);

        let mut seen = HashSet::new();
        accepted
            .into_iter()
            .filter_map(|occurrence| match occurrence.target {
                PhraseTarget::Excluded => None,
                PhraseTarget::Component(canonical) => Some(ComponentMatch {
                    canonical_name: canonical.clone(),
                    span: occurrence.span,
                }),
            })
            .filter(|found| seen.insert(found.canonical_name.clone()))
            .collect()
    }

    fn occurrences<'p>(&'p self, text: &str, tokens: &[Token]) -> Vec<Occurrence<'p>> {
        let mut found = Vec::new();
        for (index, token) in tokens.iter().enumerate() {
            let candidates = match self.dictionary.get(&token.folded) {
                Some(candidates) => candidates,
                None => continue,
            };
            for phrase in candidates {
                let last = index + phrase.remaining.len();
                if last >= tokens.len() {
                    continue;
                }
                let extends = tokens[index + 1..=last]
                    .iter()
                    .zip(&phrase.remaining)
                    .all(|(token, expected)| token.folded == *expected);
                if extends {
                    let span = token.start..tokens[last].end;
                    found.push(Occurrence {
                        first_token: index,
                        last_token: last,
                        chars: text[span.clone()].chars().count(),
                        span,
                        target: &phrase.target,
                    });
                }
            }
        }
        found
    }
}

impl Recognizer for PhraseMatcher {
    fn recognize(&self, text: &str) -> Vec<ComponentMatch> {
        self.find(text)
    }
}

/// Matches one statement against a specification.
///
/// Builds a fresh [`PhraseMatcher`]; reuse a matcher when scanning many
/// statements.
pub fn match_statement(text: &str, spec: &ComponentSpecification) -> Vec<ComponentMatch> {
    PhraseMatcher::new(spec).find(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> ComponentSpecification {
        ComponentSpecification::from_json_str(json).unwrap()
    }

    fn names(matches: &[ComponentMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.canonical_name.as_str()).collect()
    }

    fn ad_spec() -> ComponentSpecification {
        spec(r#"{"components": {"Active Directory": {"aka": ["AD", "Microsoft AD"]}}}"#)
    }

    #[test]
    fn test_alias_inside_word_does_not_match() {
        assert!(match_statement("See the Advisory board", &ad_spec()).is_empty());
    }

    #[test]
    fn test_alias_on_word_boundary_matches() {
        let matches = match_statement("Managed via AD", &ad_spec());
        assert_eq!(
            matches,
            vec![ComponentMatch {
                canonical_name: "Active Directory".to_string(),
                span: 12..14,
            }]
        );
    }

    #[test]
    fn test_match_before_punctuation() {
        let matches = match_statement("Accounts are managed with AD.", &ad_spec());
        assert_eq!(names(&matches), vec!["Active Directory"]);
    }

    #[test]
    fn test_case_insensitive() {
        let matches = match_statement("managed via microsoft ad", &ad_spec());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span, 12..24);
    }

    #[test]
    fn test_longest_match_wins() {
        let matches = match_statement("Microsoft Active Directory is used", &ad_spec());
        assert_eq!(names(&matches), vec!["Active Directory"]);
        assert_eq!(matches[0].span, 10..26);
    }

    #[test]
    fn test_longest_match_across_components() {
        let spec = spec(r#"{"components": {"Cisco": {}, "Cisco ASA": {"aka": ["ASA"]}}}"#);
        let matches = match_statement("Traffic passes the Cisco ASA firewall.", &spec);
        assert_eq!(names(&matches), vec!["Cisco ASA"]);
        assert_eq!(matches[0].span, 19..28);
    }

    #[test]
    fn test_equal_length_overlap_breaks_ties_lexically() {
        let spec = spec(r#"{"components": {"Zeta": {"aka": ["red box"]}, "Alpha": {"aka": ["box cat"]}}}"#);
        let matches = match_statement("the red box cat", &spec);
        assert_eq!(names(&matches), vec!["Alpha"]);
        assert_eq!(matches[0].span, 8..15);
    }

    #[test]
    fn test_tie_break_ignores_alias_order() {
        let forward = spec(r#"{"components": {"Zeta": {"aka": ["red box"]}, "Alpha": {"aka": ["box cat"]}}}"#);
        let reversed = spec(r#"{"components": {"Alpha": {"aka": ["box cat"]}, "Zeta": {"aka": ["red box"]}}}"#);
        assert_eq!(
            match_statement("the red box cat", &forward),
            match_statement("the red box cat", &reversed)
        );
    }

    #[test]
    fn test_multiple_components_in_one_statement() {
        let spec = spec(r#"{"components": {"Okta": {}, "Splunk": {"aka": ["Splunk Cloud"]}}}"#);
        let matches = match_statement("Okta logs are shipped to Splunk Cloud.", &spec);
        assert_eq!(names(&matches), vec!["Okta", "Splunk"]);
    }

    #[test]
    fn test_component_reported_once_per_statement() {
        let matches = match_statement("AD replicates to Microsoft AD and Active Directory.", &ad_spec());
        assert_eq!(names(&matches), vec!["Active Directory"]);
        assert_eq!(matches[0].span, 0..2);
    }

    #[test]
    fn test_excluded_alias_never_emitted() {
        let spec = spec(
            r#"{"components": {"BIA Tool": {"aka": ["Business Impact", "BIA"]}},
                "not_components": ["Business Impact"]}"#,
        );
        assert!(match_statement("A Business Impact review is held.", &spec).is_empty());
        assert_eq!(
            names(&match_statement("The BIA is reviewed.", &spec)),
            vec!["BIA Tool"]
        );
    }

    #[test]
    fn test_excluded_phrase_claims_its_text() {
        let spec = spec(
            r#"{"components": {"Business": {}}, "not_components": ["Business Impact"]}"#,
        );
        assert!(match_statement("The Business Impact analysis.", &spec).is_empty());
        assert_eq!(
            names(&match_statement("The Business unit.", &spec)),
            vec!["Business"]
        );
    }

    #[test]
    fn test_hyphenated_alias() {
        let spec = spec(r#"{"components": {"Component A": {"aka": ["Comp-A"]}}}"#);
        assert_eq!(names(&match_statement("Uses Comp-A daily", &spec)), vec!["Component A"]);
        assert!(match_statement("Uses Comp A daily", &spec).is_empty());
    }

    #[test]
    fn test_possessive_matches() {
        let matches = match_statement("AD's password policy is enforced.", &ad_spec());
        assert_eq!(names(&matches), vec!["Active Directory"]);
        assert_eq!(matches[0].span, 0..2);

        let okta = spec(r#"{"components": {"Okta": {}}}"#);
        let matches = match_statement("Okta\u{2019}s MFA is required.", &okta);
        assert_eq!(names(&matches), vec!["Okta"]);
        assert_eq!(matches[0].span, 0..4);
    }

    #[test]
    fn test_colon_separated_match() {
        let matches = match_statement("Group policy via AD:Users", &ad_spec());
        assert_eq!(names(&matches), vec!["Active Directory"]);
        assert_eq!(matches[0].span, 17..19);
    }

    #[test]
    fn test_alias_with_apostrophe() {
        let spec = spec(r#"{"components": {"O'Reilly Portal": {}}}"#);
        let matches = match_statement("Training uses the o'reilly portal.", &spec);
        assert_eq!(matches[0].span, 18..33);
    }

    #[test]
    fn test_phrase_at_end_of_text_is_not_overrun() {
        let matches = match_statement("Hosted by Microsoft", &ad_spec());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_text_and_empty_spec() {
        assert!(match_statement("", &ad_spec()).is_empty());
        assert!(match_statement("Managed via AD", &ComponentSpecification::empty()).is_empty());
    }

    #[test]
    fn test_matcher_len() {
        let matcher = PhraseMatcher::new(&ad_spec());
        assert_eq!(matcher.len(), 3);
        assert!(PhraseMatcher::new(&ComponentSpecification::empty()).is_empty());
    }

    #[test]
    fn test_recognizer_through_reference() {
        let matcher = PhraseMatcher::new(&ad_spec());
        let recognizer: &dyn Recognizer = &matcher;
        assert_eq!(recognizer.recognize("via AD").len(), 1);
    }
}
