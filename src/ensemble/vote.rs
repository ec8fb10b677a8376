//! Weighted plurality voting.
//!
//! Each surviving prediction votes for its label with
//! `effective_weight = weight × confidence`. The label with the largest sum
//! wins and the reported confidence is its share of the total.
//!
//! Ties on summed weight go to the lexicographically smallest label, so the
//! result never depends on pool order or hash order.

use std::collections::BTreeMap;

use crate::types::{EnsembleResult, LabelTally, ModelOutcome};
use crate::{DhakhtarError, Result};

/// Combine per-model outcomes into one result.
///
/// Fails with [`DhakhtarError::NoPredictionsAvailable`] only when every
/// outcome is a failure. When all survivors carry zero effective weight
/// (zero static weights or zero confidences) the vote falls back to plain
/// vote counts, so a lone survivor still gets the full share.
pub fn aggregate(outcomes: Vec<ModelOutcome>) -> Result<EnsembleResult> {
    let attempted = outcomes.len();
    let mut predictions = Vec::with_capacity(attempted);
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            ModelOutcome::Predicted(p) => predictions.push(p),
            ModelOutcome::Failed(f) => failures.push(f),
        }
    }

    if predictions.is_empty() {
        return Err(DhakhtarError::NoPredictionsAvailable { attempted });
    }

    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for p in &predictions {
        let slot = sums.entry(p.label.as_str()).or_default();
        slot.0 += p.effective_weight();
        slot.1 += 1;
    }

    let total_weight: f64 = sums.values().map(|(w, _)| w).sum();
    let by_count = !(total_weight > 0.0);
    let score = |(weight, votes): (f64, usize)| if by_count { votes as f64 } else { weight };
    let total = if by_count {
        predictions.len() as f64
    } else {
        total_weight
    };

    // BTreeMap iterates in label order; strict `>` keeps the smallest label on ties.
    let mut winner: Option<(&str, f64)> = None;
    for (label, slot) in &sums {
        let s = score(*slot);
        if winner.is_none_or(|(_, best)| s > best) {
            winner = Some((label, s));
        }
    }
    let Some((final_label, winning_score)) = winner else {
        return Err(DhakhtarError::NoPredictionsAvailable { attempted });
    };
    let final_label = final_label.to_owned();

    let average_confidence = predictions
        .iter()
        .map(|p| f64::from(p.confidence))
        .sum::<f64>()
        / predictions.len() as f64;

    let mut tallies: Vec<LabelTally> = sums
        .iter()
        .map(|(label, (weight, votes))| LabelTally {
            label: (*label).to_owned(),
            weight: *weight,
            votes: *votes,
        })
        .collect();
    tallies.sort_by(|a, b| {
        score((b.weight, b.votes))
            .total_cmp(&score((a.weight, a.votes)))
            .then_with(|| a.label.cmp(&b.label))
    });

    Ok(EnsembleResult {
        final_label,
        final_confidence: (winning_score / total).clamp(0.0, 1.0),
        average_confidence,
        model_count: predictions.len(),
        predictions,
        failures,
        tallies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_failed_is_an_error() {
        let err = aggregate(vec![
            ModelOutcome::failed("a", "boom"),
            ModelOutcome::failed("b", "boom"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            DhakhtarError::NoPredictionsAvailable { attempted: 2 }
        ));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            aggregate(Vec::new()),
            Err(DhakhtarError::NoPredictionsAvailable { attempted: 0 })
        ));
    }

    #[test]
    fn equal_weights_pick_smallest_label() {
        let r = aggregate(vec![
            ModelOutcome::predicted("a", 0.5, "Typhoid", 0.8),
            ModelOutcome::predicted("b", 0.5, "Malaria", 0.8),
        ])
        .unwrap();
        assert_eq!(r.final_label, "Malaria");
        assert!((r.final_confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_fall_back_to_vote_count() {
        let r = aggregate(vec![
            ModelOutcome::predicted("a", 0.0, "Flu", 0.9),
            ModelOutcome::predicted("b", 0.0, "Flu", 0.2),
            ModelOutcome::predicted("c", 0.0, "Cold", 0.7),
        ])
        .unwrap();
        assert_eq!(r.final_label, "Flu");
        assert!((r.final_confidence - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tallies_are_heaviest_first() {
        let r = aggregate(vec![
            ModelOutcome::predicted("a", 0.2, "Cold", 0.5),
            ModelOutcome::predicted("b", 0.4, "Flu", 0.9),
            ModelOutcome::predicted("c", 0.4, "Cold", 0.3),
        ])
        .unwrap();
        let labels: Vec<_> = r.tallies.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["Flu", "Cold"]);
        assert_eq!(r.tallies[1].votes, 2);
    }
}
