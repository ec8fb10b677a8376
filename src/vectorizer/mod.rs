//! Text → feature vector transformation.
//!
//! Every classifier in the pool was trained against the same feature space,
//! so a single [`Vectorizer`] is shared by the whole ensemble. Its
//! [`dimension()`](Vectorizer::dimension) is checked against each model's
//! input width at startup.

mod tfidf;

pub use tfidf::{Norm, TfidfArtifact, TfidfVectorizer, tokenize};

use crate::Result;
use crate::types::FeatureVector;

/// Turns raw symptom text into the fixed-size representation the models expect.
pub trait Vectorizer: Send + Sync {
    /// Number of feature columns.
    fn dimension(&self) -> usize;

    /// Vectorize one text. Unknown terms are ignored, so any text succeeds;
    /// text without known terms yields an all-zero vector.
    fn transform(&self, text: &str) -> Result<FeatureVector>;
}
