//! Disease → precaution advice.
//!
//! Matching is deliberately loose: an exact key wins, otherwise the first
//! entry (in table order) whose name contains the label or is contained in it,
//! ignoring case. Short labels can therefore match unexpected entries
//! ("Flu" would match "Influenza"); that behaviour is kept as is.

mod builtin;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use builtin::{GENERIC_PRECAUTIONS, builtin_book};

use crate::{DhakhtarError, Result, artifact};

/// Advice for one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecautionEntry {
    /// English disease label as produced by the classifiers.
    pub disease: String,
    pub advice: Vec<String>,
    /// Somali display name, when the table provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub somali_name: Option<String>,
    /// Somali advice written natively rather than machine translated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub somali_advice: Option<Vec<String>>,
}

/// How a label was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    /// Substring match against the entry named `key`.
    Partial { key: String },
    Generic,
}

/// Result of [`PrecautionBook::lookup`].
#[derive(Debug, Clone)]
pub struct PrecautionMatch<'a> {
    pub kind: MatchKind,
    /// `None` for the generic fallback.
    pub entry: Option<&'a PrecautionEntry>,
    generic: &'a [String],
}

impl<'a> PrecautionMatch<'a> {
    /// English advice for the match.
    pub fn advice(&self) -> &'a [String] {
        self.entry.map_or(self.generic, |e| e.advice.as_slice())
    }

    /// Somali advice, if the matched entry carries it.
    pub fn somali_advice(&self) -> Option<&'a [String]> {
        self.entry
            .and_then(|e| e.somali_advice.as_deref())
            .filter(|a| !a.is_empty())
    }

    pub fn somali_name(&self) -> Option<&'a str> {
        self.entry.and_then(|e| e.somali_name.as_deref())
    }

    pub fn is_generic(&self) -> bool {
        self.kind == MatchKind::Generic
    }
}

/// On-disk shape of a precaution override file.
#[derive(Debug, Clone, Deserialize)]
struct PrecautionTable {
    diseases: Vec<PrecautionEntry>,
    generic: Vec<String>,
}

/// Ordered precaution table with a generic fallback.
#[derive(Debug, Clone)]
pub struct PrecautionBook {
    entries: Vec<PrecautionEntry>,
    generic: Vec<String>,
}

impl Default for PrecautionBook {
    fn default() -> Self {
        builtin_book()
    }
}

impl PrecautionBook {
    pub fn new(entries: Vec<PrecautionEntry>, generic: Vec<String>) -> Result<Self> {
        if generic.is_empty() {
            return Err(DhakhtarError::Configuration(
                "generic precautions must not be empty".into(),
            ));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.advice.is_empty() {
                return Err(DhakhtarError::Configuration(format!(
                    "no advice for '{}'",
                    entry.disease
                )));
            }
            if entries[..i].iter().any(|e| e.disease == entry.disease) {
                return Err(DhakhtarError::Configuration(format!(
                    "duplicate precaution entry '{}'",
                    entry.disease
                )));
            }
        }
        Ok(Self { entries, generic })
    }

    /// Load a replacement table from JSON:
    /// `{"diseases": [{"disease", "advice", "somali_name"?, "somali_advice"?}], "generic": [..]}`.
    pub fn load(path: &Path) -> Result<Self> {
        let table: PrecautionTable = artifact::load_json(path)?;
        let book = Self::new(table.diseases, table.generic)?;
        debug!(path = %path.display(), diseases = book.len(), "loaded precaution table");
        Ok(book)
    }

    pub fn entries(&self) -> &[PrecautionEntry] {
        &self.entries
    }

    pub fn generic(&self) -> &[String] {
        &self.generic
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, label: &str) -> PrecautionMatch<'_> {
        if let Some(entry) = self.entries.iter().find(|e| e.disease == label) {
            return self.matched(MatchKind::Exact, entry);
        }

        let needle = label.to_lowercase();
        let partial = self.entries.iter().find(|e| {
            let key = e.disease.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        });
        if let Some(entry) = partial {
            let kind = MatchKind::Partial {
                key: entry.disease.clone(),
            };
            return self.matched(kind, entry);
        }

        debug!(label, "no precaution entry, using generic advice");
        PrecautionMatch {
            kind: MatchKind::Generic,
            entry: None,
            generic: &self.generic,
        }
    }

    fn matched<'a>(&'a self, kind: MatchKind, entry: &'a PrecautionEntry) -> PrecautionMatch<'a> {
        debug!(disease = %entry.disease, ?kind, "precaution match");
        PrecautionMatch {
            kind,
            entry: Some(entry),
            generic: &self.generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(disease: &str) -> PrecautionEntry {
        PrecautionEntry {
            disease: disease.into(),
            advice: vec![format!("{disease} advice")],
            somali_name: None,
            somali_advice: None,
        }
    }

    #[test]
    fn empty_generic_rejected() {
        assert!(PrecautionBook::new(vec![entry("Malaria")], Vec::new()).is_err());
    }

    #[test]
    fn duplicate_disease_rejected() {
        let err = PrecautionBook::new(
            vec![entry("Malaria"), entry("Malaria")],
            vec!["rest".into()],
        );
        assert!(err.is_err());
    }

    #[test]
    fn partial_match_follows_table_order() {
        let book = PrecautionBook::new(
            vec![entry("Cold"), entry("Common Cold")],
            vec!["rest".into()],
        )
        .unwrap();
        let m = book.lookup("common cold");
        assert_eq!(m.kind, MatchKind::Partial { key: "Cold".into() });
    }
}
