//! Prediction types shared by the model pool and the ensemble.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What one classifier says about one feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPrediction {
    pub label: String,
    /// Normalised confidence of the top class, in `[0, 1]`.
    pub confidence: f32,
}

impl LabelPrediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A successful prediction from a named pool entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub model: String,
    /// Static voting weight of the entry, in `[0, 1]`.
    pub weight: f32,
    pub label: String,
    pub confidence: f32,
}

impl ModelPrediction {
    pub fn new(
        model: impl Into<String>,
        weight: f32,
        label: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            model: model.into(),
            weight,
            label: label.into(),
            confidence,
        }
    }

    /// `weight × confidence`: this model's voting power for this request.
    pub fn effective_weight(&self) -> f64 {
        f64::from(self.weight) * f64::from(self.confidence)
    }
}

/// A pool entry that could not predict for this request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFailure {
    pub model: String,
    pub reason: String,
}

/// Per-model result collected before voting.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Predicted(ModelPrediction),
    Failed(ModelFailure),
}

impl ModelOutcome {
    pub fn predicted(
        model: impl Into<String>,
        weight: f32,
        label: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self::Predicted(ModelPrediction::new(model, weight, label, confidence))
    }

    pub fn failed(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed(ModelFailure {
            model: model.into(),
            reason: reason.into(),
        })
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Predicted(p) => &p.model,
            Self::Failed(f) => &f.model,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Predicted(_))
    }
}

/// Summed votes for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTally {
    pub label: String,
    /// Sum of effective weights of the models that voted for this label.
    pub weight: f64,
    pub votes: usize,
}

/// Outcome of one ensemble vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub final_label: String,
    /// Vote share of the winning label, in `[0, 1]`. Not a probability.
    pub final_confidence: f64,
    /// Unweighted mean of the individual model confidences.
    pub average_confidence: f64,
    /// Successful predictions in pool order.
    pub predictions: Vec<ModelPrediction>,
    /// Models dropped from this vote.
    pub failures: Vec<ModelFailure>,
    /// Per-label totals, heaviest first.
    pub tallies: Vec<LabelTally>,
    /// Number of models that produced a prediction.
    pub model_count: usize,
}

impl EnsembleResult {
    /// Label predicted by each model.
    pub fn per_model_labels(&self) -> BTreeMap<String, String> {
        self.predictions
            .iter()
            .map(|p| (p.model.clone(), p.label.clone()))
            .collect()
    }

    /// Confidence reported by each model.
    pub fn per_model_confidences(&self) -> BTreeMap<String, f32> {
        self.predictions
            .iter()
            .map(|p| (p.model.clone(), p.confidence))
            .collect()
    }

    /// Whether some models were dropped but the vote still happened.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
