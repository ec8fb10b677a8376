//! TF-IDF bag-of-terms vectorizer.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Vectorizer;
use crate::Result;
use crate::artifact;
use crate::types::FeatureVector;

/// Row normalisation applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// On-disk form of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    /// Term (unigram or space-joined n-gram) → column index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f32>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

fn default_true() -> bool {
    true
}

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    lowercase: bool,
    sublinear_tf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    /// Load and validate a vectorizer artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact: TfidfArtifact = artifact::load_json(path)?;
        let vectorizer = Self::from_artifact(artifact, &path.display().to_string())?;
        debug!(
            path = %path.display(),
            vocabulary = vectorizer.vocabulary.len(),
            "loaded tf-idf vectorizer"
        );
        Ok(vectorizer)
    }

    /// Validate an in-memory artifact. `origin` names it in errors.
    pub fn from_artifact(artifact: TfidfArtifact, origin: &str) -> Result<Self> {
        let dimension = artifact.idf.len();
        if dimension == 0 {
            return Err(artifact::invalid(origin, "empty idf table"));
        }
        if let Some((col, weight)) = artifact
            .idf
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(artifact::invalid(
                origin,
                format!("idf entry {col} is {weight}, expected a finite non-negative weight"),
            ));
        }
        if let Some((term, idx)) = artifact
            .vocabulary
            .iter()
            .find(|(_, idx)| **idx >= dimension)
        {
            return Err(artifact::invalid(
                origin,
                format!("term '{term}' maps to column {idx}, beyond {dimension} idf entries"),
            ));
        }
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(artifact::invalid(
                origin,
                format!("invalid ngram range ({min_n}, {max_n})"),
            ));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            lowercase: artifact.lowercase,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    /// Terms (after stop-word removal) and their n-grams, in text order.
    fn terms(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<String> = tokenize(&text)
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }
        terms
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Result<FeatureVector> {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in self.terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        if self.norm == Norm::L2 {
            let norm = weighted.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for (_, v) in &mut weighted {
                    *v /= norm;
                }
            }
        }

        FeatureVector::from_pairs(self.dimension(), weighted)
    }
}

/// Split text into word tokens of at least two characters.
///
/// A token is a maximal run of alphanumeric characters or underscores.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DhakhtarError;

    fn artifact() -> TfidfArtifact {
        let vocabulary = [("fever", 0), ("headache", 1), ("fever headache", 2), ("cough", 3)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        TfidfArtifact {
            vocabulary,
            idf: vec![1.0, 2.0, 3.0, 1.5],
            ngram_range: (1, 2),
            stop_words: vec!["and".into(), "i".into()],
            lowercase: true,
            sublinear_tf: false,
            norm: Norm::None,
        }
    }

    #[test]
    fn tokenizer_drops_single_characters() {
        let tokens: Vec<_> = tokenize("I have a high-fever, x_y!").collect();
        assert_eq!(tokens, vec!["have", "high", "fever", "x_y"]);
    }

    #[test]
    fn bigrams_skip_stop_words() {
        let v = TfidfVectorizer::from_artifact(artifact(), "test").unwrap();
        // "and" is removed before bigrams, so "fever headache" is formed.
        let features = v.transform("Fever and HEADACHE").unwrap();
        assert_eq!(features.get(0), 1.0);
        assert_eq!(features.get(1), 2.0);
        assert_eq!(features.get(2), 3.0);
        assert_eq!(features.get(3), 0.0);
    }

    #[test]
    fn repeated_terms_count() {
        let v = TfidfVectorizer::from_artifact(artifact(), "test").unwrap();
        let features = v.transform("cough cough").unwrap();
        assert!((features.get(3) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn sublinear_and_l2() {
        let mut a = artifact();
        a.sublinear_tf = true;
        a.norm = Norm::L2;
        let v = TfidfVectorizer::from_artifact(a, "test").unwrap();
        let features = v.transform("cough cough fever").unwrap();
        let norm: f32 = features.iter().map(|(_, x)| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        // cough: (1 + ln 2) * 1.5, fever: 1 * 1.0
        let ratio = features.get(3) / features.get(0);
        assert!((ratio - (1.0 + 2f32.ln()) * 1.5).abs() < 1e-4);
    }

    #[test]
    fn unknown_text_is_empty_vector() {
        let v = TfidfVectorizer::from_artifact(artifact(), "test").unwrap();
        let features = v.transform("zzz qqq").unwrap();
        assert!(features.is_empty());
        assert_eq!(features.dimension(), 4);
    }

    #[test]
    fn vocabulary_out_of_range_rejected() {
        let mut a = artifact();
        a.vocabulary.insert("rash".into(), 9);
        assert!(TfidfVectorizer::from_artifact(a, "test").is_err());
    }

    #[test]
    fn corrupt_idf_rejected_at_load() {
        for bad in [f32::NAN, f32::INFINITY, -0.5] {
            let mut a = artifact();
            a.idf[2] = bad;
            let err = TfidfVectorizer::from_artifact(a, "vectorizer.json").unwrap_err();
            assert!(matches!(
                err,
                DhakhtarError::Artifact { ref path, ref reason }
                    if path == "vectorizer.json" && reason.contains("idf entry 2")
            ));
        }
    }
}
