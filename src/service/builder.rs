//! Builder for [`DiagnosisService`].

use std::sync::Arc;

use super::DiagnosisService;
use crate::ensemble::ConfidenceGate;
use crate::models::ModelPool;
use crate::precautions::PrecautionBook;
use crate::store::{MemoryStore, PredictionStore};
use crate::translate::LanguagePipeline;
use crate::vectorizer::Vectorizer;
use crate::{DhakhtarError, Result};

/// Shortest accepted symptom description, in characters.
pub const DEFAULT_MIN_SYMPTOM_CHARS: usize = 5;

/// Main entry point for assembling a service.
///
/// ```rust,no_run
/// # use std::path::Path;
/// # use std::sync::Arc;
/// # use dhakhtar::{Dhakhtar, ModelPool, ModelSpec, TfidfVectorizer, Vectorizer};
/// # fn main() -> dhakhtar::Result<()> {
/// let vectorizer = TfidfVectorizer::load(Path::new("artifacts/vectorizer.json"))?;
/// let specs = [ModelSpec {
///     name: "logreg".into(),
///     path: "artifacts/logreg.json".into(),
///     weight: 1.0,
/// }];
/// let pool = ModelPool::from_artifacts(&specs, vectorizer.dimension())?;
/// let service = Dhakhtar::builder()
///     .vectorizer(Arc::new(vectorizer))
///     .pool(Arc::new(pool))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Dhakhtar;

impl Dhakhtar {
    pub fn builder() -> DhakhtarBuilder {
        DhakhtarBuilder::new()
    }
}

pub struct DhakhtarBuilder {
    vectorizer: Option<Arc<dyn Vectorizer>>,
    pool: Option<Arc<ModelPool>>,
    gate: ConfidenceGate,
    precautions: PrecautionBook,
    language: LanguagePipeline,
    store: Option<Arc<dyn PredictionStore>>,
    min_symptom_chars: usize,
}

impl Default for DhakhtarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DhakhtarBuilder {
    pub fn new() -> Self {
        Self {
            vectorizer: None,
            pool: None,
            gate: ConfidenceGate::default(),
            precautions: PrecautionBook::default(),
            language: LanguagePipeline::disabled(),
            store: None,
            min_symptom_chars: DEFAULT_MIN_SYMPTOM_CHARS,
        }
    }

    pub fn vectorizer(mut self, vectorizer: Arc<dyn Vectorizer>) -> Self {
        self.vectorizer = Some(vectorizer);
        self
    }

    pub fn pool(mut self, pool: Arc<ModelPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn gate(mut self, gate: ConfidenceGate) -> Self {
        self.gate = gate;
        self
    }

    /// Replace the built-in precaution table.
    pub fn precautions(mut self, book: PrecautionBook) -> Self {
        self.precautions = book;
        self
    }

    /// Language handling. Defaults to English only, no translator.
    pub fn language(mut self, pipeline: LanguagePipeline) -> Self {
        self.language = pipeline;
        self
    }

    /// Defaults to a [`MemoryStore`].
    pub fn store(mut self, store: Arc<dyn PredictionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn min_symptom_chars(mut self, n: usize) -> Self {
        self.min_symptom_chars = n;
        self
    }

    pub fn build(self) -> Result<DiagnosisService> {
        let vectorizer = self
            .vectorizer
            .ok_or_else(|| DhakhtarError::Configuration("no vectorizer configured".into()))?;
        let pool = self
            .pool
            .ok_or_else(|| DhakhtarError::Configuration("no model pool configured".into()))?;

        let dimension = vectorizer.dimension();
        for entry in pool.entries() {
            if let Some(expected) = entry.classifier().input_dimension() {
                if expected != dimension {
                    return Err(DhakhtarError::Configuration(format!(
                        "model '{}' expects {expected} features but the vectorizer produces {dimension}",
                        entry.name()
                    )));
                }
            }
        }

        Ok(DiagnosisService {
            vectorizer,
            pool,
            gate: self.gate,
            precautions: self.precautions,
            language: self.language,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
            min_symptom_chars: self.min_symptom_chars,
        })
    }
}
