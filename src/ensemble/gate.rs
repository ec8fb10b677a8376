//! Confidence threshold applied after the vote.

use serde::{Deserialize, Serialize};

use crate::types::EnsembleResult;
use crate::{DhakhtarError, Result};

/// Threshold used when none is configured.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.20;

/// Which ensemble figure the gate compares against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMetric {
    /// Winning label's share of the weighted vote.
    #[default]
    VoteShare,
    /// Unweighted mean of the model confidences.
    AverageConfidence,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Accept,
    /// Result is too unclear to act on. Not an error.
    LowConfidence { confidence: f64, threshold: f64 },
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f64,
    metric: GateMetric,
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            metric: GateMetric::default(),
        }
    }
}

impl ConfidenceGate {
    /// Gate on vote share with `threshold` in `[0, 1]`.
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(DhakhtarError::Configuration(format!(
                "confidence threshold {threshold} outside [0, 1]"
            )));
        }
        Ok(Self {
            threshold,
            metric: GateMetric::VoteShare,
        })
    }

    pub fn with_metric(mut self, metric: GateMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn metric(&self) -> GateMetric {
        self.metric
    }

    /// The figure this gate compares.
    pub fn confidence_of(&self, result: &EnsembleResult) -> f64 {
        match self.metric {
            GateMetric::VoteShare => result.final_confidence,
            GateMetric::AverageConfidence => result.average_confidence,
        }
    }

    /// Confidence equal to the threshold is accepted.
    pub fn evaluate(&self, result: &EnsembleResult) -> GateDecision {
        let confidence = self.confidence_of(result);
        if confidence >= self.threshold {
            GateDecision::Accept
        } else {
            GateDecision::LowConfidence {
                confidence,
                threshold: self.threshold,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::aggregate;
    use crate::types::ModelOutcome;

    fn split_vote() -> EnsembleResult {
        // Shares: Flu 0.5, Cold 0.25, Typhoid 0.25.
        aggregate(vec![
            ModelOutcome::predicted("a", 0.5, "Flu", 1.0),
            ModelOutcome::predicted("b", 0.25, "Cold", 1.0),
            ModelOutcome::predicted("c", 0.25, "Typhoid", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn threshold_is_inclusive() {
        let result = split_vote();
        let gate = ConfidenceGate::new(0.5).unwrap();
        assert_eq!(gate.evaluate(&result), GateDecision::Accept);
    }

    #[test]
    fn below_threshold_is_low_confidence() {
        let result = split_vote();
        let gate = ConfidenceGate::new(0.6).unwrap();
        match gate.evaluate(&result) {
            GateDecision::LowConfidence {
                confidence,
                threshold,
            } => {
                assert!((confidence - 0.5).abs() < 1e-9);
                assert_eq!(threshold, 0.6);
            }
            other => panic!("expected low confidence, got {other:?}"),
        }
    }

    #[test]
    fn average_metric_reads_mean_confidence() {
        let result = aggregate(vec![ModelOutcome::predicted("a", 1.0, "Flu", 0.1)]).unwrap();
        let vote = ConfidenceGate::default();
        let mean = ConfidenceGate::default().with_metric(GateMetric::AverageConfidence);
        assert!(vote.evaluate(&result).is_accepted());
        assert!(!mean.evaluate(&result).is_accepted());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        assert!(ConfidenceGate::new(1.5).is_err());
        assert!(ConfidenceGate::new(f64::NAN).is_err());
    }
}
