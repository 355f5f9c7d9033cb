//! Recognized control catalogs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A control catalog that control identifiers are interpreted against.
///
/// The set is closed: any other identifier is rejected at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Catalog {
    #[serde(rename = "NIST_SP-800-53_rev4")]
    Nist80053Rev4,
    #[serde(rename = "NIST_SP-800-53_rev5")]
    Nist80053Rev5,
    #[serde(rename = "NIST_SP-800-171_rev1")]
    Nist800171Rev1,
}

impl Catalog {
    /// All recognized catalogs.
    pub const ALL: [Catalog; 3] = [
        Catalog::Nist80053Rev4,
        Catalog::Nist80053Rev5,
        Catalog::Nist800171Rev1,
    ];

    /// Returns the catalog identifier string.
    pub fn id(&self) -> &'static str {
        match self {
            Catalog::Nist80053Rev4 => "NIST_SP-800-53_rev4",
            Catalog::Nist80053Rev5 => "NIST_SP-800-53_rev5",
            Catalog::Nist800171Rev1 => "NIST_SP-800-171_rev1",
        }
    }

    /// Looks up a catalog by its exact identifier.
    pub fn from_id(id: &str) -> Option<Catalog> {
        Catalog::ALL.iter().copied().find(|catalog| catalog.id() == id)
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_recognized() {
        assert_eq!(Catalog::from_id("NIST_SP-800-53_rev4"), Some(Catalog::Nist80053Rev4));
        assert_eq!(Catalog::from_id("NIST_SP-800-53_rev5"), Some(Catalog::Nist80053Rev5));
        assert_eq!(
            Catalog::from_id("NIST_SP-800-171_rev1"),
            Some(Catalog::Nist800171Rev1)
        );
    }

    #[test]
    fn test_from_id_is_exact() {
        assert_eq!(Catalog::from_id("nist_sp-800-53_rev4"), None);
        assert_eq!(Catalog::from_id("NIST_SP-800-53"), None);
        assert_eq!(Catalog::from_id(""), None);
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&Catalog::Nist800171Rev1).unwrap();
        assert_eq!(json, "\"NIST_SP-800-171_rev1\"");
        let parsed: Catalog = serde_json::from_str("\"NIST_SP-800-53_rev5\"").unwrap();
        assert_eq!(parsed, Catalog::Nist80053Rev5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Catalog::Nist80053Rev4.to_string(), "NIST_SP-800-53_rev4");
    }
}
