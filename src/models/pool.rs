//! Read-only pool of weighted classifiers.
//!
//! The pool is assembled once at startup through [`ModelPoolBuilder`] and is
//! immutable afterwards; share it with `Arc<ModelPool>`. Concurrent requests
//! only read it, so no locking is involved.
//!
//! # Partial failure
//!
//! [`ModelPool::predict_all`] asks every entry for a prediction and returns
//! one [`ModelOutcome`] per entry, in registration order. A classifier that
//! errors or panics becomes [`ModelOutcome::Failed`]; it is logged and
//! counted but never aborts the call. Whether *any* prediction survived is
//! the ensemble's concern, not the pool's.
//!
//! ```text
//! features ──► ┌────────────┐  Predicted(logreg, "Malaria", 0.81)
//!              │ logreg 0.4 │──────────────────────────────────┐
//!              ├────────────┤  Failed(forest, "shape mismatch") │
//!              │ forest 0.3 │──────────────────────────────────┤──► Vec<ModelOutcome>
//!              ├────────────┤  Predicted(svm, "Malaria", 0.64)  │
//!              │ svm    0.3 │──────────────────────────────────┘
//!              └────────────┘
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Classifier, load_classifier};
use crate::telemetry;
use crate::types::{FeatureVector, ModelOutcome};
use crate::{DhakhtarError, Result};

/// Tolerance for the "weights sum to about 1.0" sanity check.
const WEIGHT_SUM_TOLERANCE: f32 = 0.05;

/// Where to load one pool entry from.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub path: PathBuf,
    pub weight: f32,
}

/// A named classifier and its static voting weight.
#[derive(Clone)]
pub struct ModelEntry {
    name: String,
    weight: f32,
    classifier: Arc<dyn Classifier>,
}

impl ModelEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("family", &self.classifier.family())
            .finish()
    }
}

/// Builder for [`ModelPool`]. Entries keep registration order.
#[derive(Default)]
pub struct ModelPoolBuilder {
    entries: Vec<ModelEntry>,
}

impl ModelPoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classifier with its static weight.
    pub fn add(
        mut self,
        name: impl Into<String>,
        weight: f32,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        self.entries.push(ModelEntry {
            name: name.into(),
            weight,
            classifier,
        });
        self
    }

    /// Validate and freeze the pool.
    ///
    /// Rejects an empty pool, duplicate names and weights outside `[0, 1]`.
    /// Weights that do not sum to roughly 1.0 are only warned about.
    pub fn build(self) -> Result<ModelPool> {
        if self.entries.is_empty() {
            return Err(DhakhtarError::Configuration(
                "model pool must contain at least one classifier".into(),
            ));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if !entry.weight.is_finite() || !(0.0..=1.0).contains(&entry.weight) {
                return Err(DhakhtarError::Configuration(format!(
                    "model '{}' has weight {} outside [0, 1]",
                    entry.name, entry.weight
                )));
            }
            if self.entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(DhakhtarError::Configuration(format!(
                    "duplicate model name '{}'",
                    entry.name
                )));
            }
        }

        let total: f32 = self.entries.iter().map(|e| e.weight).sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!(total, "model weights do not sum to 1.0");
        }

        Ok(ModelPool {
            entries: self.entries,
        })
    }
}

/// Immutable registry of weighted classifiers. Never empty.
#[derive(Debug)]
pub struct ModelPool {
    entries: Vec<ModelEntry>,
}

impl ModelPool {
    pub fn builder() -> ModelPoolBuilder {
        ModelPoolBuilder::new()
    }

    /// Load every spec from disk and check each model accepts `dimension`
    /// input columns.
    pub fn from_artifacts(specs: &[ModelSpec], dimension: usize) -> Result<Self> {
        let mut builder = Self::builder();
        for spec in specs {
            let classifier = load_classifier(&spec.path)?;
            if let Some(expected) = classifier.input_dimension() {
                if expected != dimension {
                    return Err(DhakhtarError::Configuration(format!(
                        "model '{}' expects {expected} features but the vectorizer produces {dimension}",
                        spec.name
                    )));
                }
            }
            builder = builder.add(spec.name.clone(), spec.weight, classifier);
        }
        builder.build()
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    /// Entry names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: an empty pool cannot be built.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every classifier on `features`.
    pub fn predict_all(&self, features: &FeatureVector) -> Vec<ModelOutcome> {
        self.entries
            .iter()
            .map(|entry| Self::predict_one(entry, features))
            .collect()
    }

    fn predict_one(entry: &ModelEntry, features: &FeatureVector) -> ModelOutcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| entry.classifier.predict(features)));

        let outcome = match attempt {
            Ok(Ok(p)) if p.confidence.is_finite() => ModelOutcome::predicted(
                &entry.name,
                entry.weight,
                p.label,
                p.confidence.clamp(0.0, 1.0),
            ),
            Ok(Ok(_)) => ModelOutcome::failed(&entry.name, "non-finite confidence"),
            Ok(Err(e)) => ModelOutcome::failed(&entry.name, e.to_string()),
            Err(payload) => ModelOutcome::failed(
                &entry.name,
                format!("classifier panicked: {}", panic_message(payload.as_ref())),
            ),
        };

        match &outcome {
            ModelOutcome::Predicted(p) => {
                debug!(model = %p.model, label = %p.label, confidence = p.confidence, "model predicted");
                Self::record(&entry.name, true);
            }
            ModelOutcome::Failed(f) => {
                warn!(model = %f.model, reason = %f.reason, "model failed to predict");
                Self::record(&entry.name, false);
            }
        }
        outcome
    }

    fn record(model: &str, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::MODEL_PREDICTIONS_TOTAL,
            "model" => model.to_owned(),
            "status" => status,
        )
        .increment(1);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
