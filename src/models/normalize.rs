//! Confidence normalisation shared by all model families.
//!
//! One rule for every family:
//!
//! - probability vectors are renormalised to sum to 1, then the top class
//!   probability is the confidence;
//! - raw scores (margins, logits) go through a numerically stable softmax
//!   first and are then treated as a probability vector.
//!
//! The result is clamped to `[0, 1]`. NaN or infinite outputs are errors.
//! Ties between classes resolve to the lowest class index.

use crate::types::LabelPrediction;
use crate::{DhakhtarError, Result};

use super::ModelFamily;

/// Pick the top class from a probability vector.
pub fn top_of_probabilities(
    family: ModelFamily,
    classes: &[String],
    probabilities: &[f32],
) -> Result<LabelPrediction> {
    if classes.is_empty() || classes.len() != probabilities.len() {
        return Err(failure(
            family,
            format!(
                "{} outputs for {} classes",
                probabilities.len(),
                classes.len()
            ),
        ));
    }
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(failure(family, "probabilities must be finite and non-negative"));
    }

    let total: f32 = probabilities.iter().sum();
    if total <= 0.0 {
        return Err(failure(family, "probability mass is zero"));
    }

    let (best, best_p) = probabilities
        .iter()
        .enumerate()
        .fold((0, f32::MIN), |(bi, bp), (i, &p)| {
            if p > bp { (i, p) } else { (bi, bp) }
        });

    Ok(LabelPrediction::new(
        classes[best].clone(),
        (best_p / total).clamp(0.0, 1.0),
    ))
}

/// Pick the top class from raw scores via softmax.
pub fn top_of_scores(
    family: ModelFamily,
    classes: &[String],
    scores: &[f32],
) -> Result<LabelPrediction> {
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(failure(family, "non-finite decision score"));
    }
    let probabilities = softmax(scores);
    top_of_probabilities(family, classes, &probabilities)
}

/// Numerically stable softmax.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

pub fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

fn failure(family: ModelFamily, reason: impl Into<String>) -> DhakhtarError {
    DhakhtarError::Classifier {
        model: family.to_string(),
        reason: reason.into(),
    }
}
