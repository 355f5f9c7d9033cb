//! Known components, their aliases, and excluded candidate names.
//!
//! A specification document looks like:
//!
//! ```json
//! {
//!   "components": {
//!     "Active Directory": {"aka": ["AD", "Microsoft AD"]}
//!   },
//!   "not_components": ["Business Impact"]
//! }
//! ```
//!
//! Loading builds a flat lookup from folded name to canonical name once, so
//! matching never walks the document again. A name folds to its lowercased
//! word tokens, the same tokens the matcher compares, so two names collide
//! exactly when they would match the same text.
//!
//! # Exclusions
//!
//! An excluded name is never emitted. Excluding an alias suppresses only that
//! alias; excluding a canonical name suppresses the whole component, since
//! every match of it would emit the excluded name.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{SspError, SspResult};
use crate::token::fold_key;

/// The parsed specification document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDocument {
    /// Canonical name → entry
    #[serde(default)]
    pub components: BTreeMap<String, ComponentEntry>,
    /// Names that must never be emitted as components
    #[serde(default)]
    pub not_components: Vec<String>,
}

/// Aliases of one canonical component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    #[serde(default)]
    pub aka: Vec<String>,
}

/// Alias lookup and exclusions, built once per specification document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSpecification {
    /// Folded alias or canonical name → canonical name (original casing)
    canonical_of: HashMap<String, String>,
    /// Folded excluded names
    excluded: HashSet<String>,
}

impl ComponentSpecification {
    /// An empty specification: nothing is known, nothing is excluded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a JSON specification document and builds the lookup.
    pub fn from_json_str(json: &str) -> SspResult<Self> {
        let document: ComponentDocument =
            serde_json::from_str(json).map_err(|e| SspError::SpecificationDocument {
                message: e.to_string(),
            })?;
        Self::from_document(&document)
    }

    /// Reads and parses a JSON specification document.
    pub fn from_reader<R: Read>(reader: R) -> SspResult<Self> {
        let document: ComponentDocument =
            serde_json::from_reader(reader).map_err(|e| SspError::SpecificationDocument {
                message: e.to_string(),
            })?;
        Self::from_document(&document)
    }

    /// Builds the lookup from an already parsed document.
    ///
    /// Fails when a name (canonical or alias) belongs to two components.
    pub fn from_document(document: &ComponentDocument) -> SspResult<Self> {
        let mut canonical_of: HashMap<String, String> = HashMap::new();

        for (canonical, entry) in &document.components {
            for name in std::iter::once(canonical).chain(entry.aka.iter()) {
                let key = fold_key(name);
                if key.is_empty() {
                    warn!(component = %canonical, "ignoring empty component name");
                    continue;
                }
                match canonical_of.get(&key) {
                    Some(existing) if existing != canonical => {
                        return Err(SspError::Specification {
                            name: name.clone(),
                            first: existing.clone(),
                            second: canonical.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        canonical_of.insert(key, canonical.clone());
                    }
                }
            }
        }

        let excluded: HashSet<String> = document
            .not_components
            .iter()
            .map(|name| fold_key(name))
            .filter(|key| !key.is_empty())
            .collect();

        let suppressed: BTreeSet<String> = document
            .components
            .keys()
            .filter(|canonical| excluded.contains(&fold_key(canonical)))
            .cloned()
            .collect();
        for canonical in &suppressed {
            warn!(component = %canonical, "canonical name is excluded; component suppressed");
        }

        canonical_of
            .retain(|key, canonical| !excluded.contains(key) && !suppressed.contains(canonical));

        debug!(
            names = canonical_of.len(),
            excluded = excluded.len(),
            "component specification loaded"
        );

        Ok(Self {
            canonical_of,
            excluded,
        })
    }

    /// Canonical name for a known name or alias (case-insensitive).
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.canonical_of.get(&fold_key(name)).map(String::as_str)
    }

    /// Returns true if `name` is listed as not a component (case-insensitive).
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(&fold_key(name))
    }

    /// Regularizes a candidate name recognized elsewhere.
    ///
    /// Excluded names yield `None`, known names and aliases yield their
    /// canonical name, and unknown names pass through trimmed.
    pub fn canonicalize(&self, name: &str) -> Option<String> {
        if self.is_excluded(name) {
            return None;
        }
        match self.canonical_name(name) {
            Some(canonical) => Some(canonical.to_string()),
            None => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    /// Canonicalizes a set of candidate names, dropping excluded ones.
    pub fn filter<I, S>(&self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.canonicalize(name.as_ref()))
            .collect()
    }

    /// The distinct canonical component names that can be matched.
    pub fn components(&self) -> BTreeSet<&str> {
        self.canonical_of.values().map(String::as_str).collect()
    }

    /// Number of matchable names (canonical names plus aliases).
    pub fn len(&self) -> usize {
        self.canonical_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_of.is_empty()
    }

    /// Folded matchable names with their canonical names.
    pub(crate) fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.canonical_of
            .iter()
            .map(|(key, canonical)| (key.as_str(), canonical.as_str()))
    }

    /// Folded excluded names.
    pub(crate) fn excluded_names(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }
}
