//! The uniform classifier interface.
//!
//! Model families expose different native outputs (a probability vector, raw
//! one-vs-rest margins). Each family adapter hides that behind
//! [`Classifier::predict`], which always returns a single label with a
//! confidence normalised to `[0, 1]`. See [`super::normalize`] for the rule.
//!
//! # Failure contract
//!
//! `predict` returns an error for anything that prevents a usable answer:
//! a feature vector of the wrong width, non-finite outputs, a corrupt tree.
//! The [`ModelPool`](super::ModelPool) converts errors (and panics) into
//! [`ModelOutcome::Failed`](crate::types::ModelOutcome::Failed) so one broken
//! model never aborts the ensemble.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{FeatureVector, LabelPrediction};

/// Model family, used for logging and artifact dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    LogisticRegression,
    RandomForest,
    LinearSvm,
    Mlp,
    /// Anything supplied programmatically (tests, embedding applications).
    Custom,
}

impl ModelFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogisticRegression => "logistic_regression",
            Self::RandomForest => "random_forest",
            Self::LinearSvm => "linear_svm",
            Self::Mlp => "mlp",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Given a feature vector, return `(label, normalised confidence)`.
pub trait Classifier: Send + Sync {
    /// Family of the underlying model.
    fn family(&self) -> ModelFamily {
        ModelFamily::Custom
    }

    /// Class labels in model output order (empty when unknown).
    fn classes(&self) -> &[String] {
        &[]
    }

    /// Expected feature width, if the model has a fixed one.
    fn input_dimension(&self) -> Option<usize> {
        None
    }

    /// Predict the top label and its confidence.
    fn predict(&self, features: &FeatureVector) -> Result<LabelPrediction>;
}
