//! Ensemble prediction: run the pool, vote, then gate.

mod gate;
mod vote;

use std::time::Instant;

use tracing::{debug, instrument, warn};

pub use gate::{ConfidenceGate, DEFAULT_CONFIDENCE_THRESHOLD, GateDecision, GateMetric};
pub use vote::aggregate;

use crate::Result;
use crate::models::ModelPool;
use crate::telemetry;
use crate::types::{EnsembleResult, FeatureVector};

/// Run every model in `pool` on `features` and combine the survivors.
///
/// Individual model failures are logged by the pool and listed in
/// [`EnsembleResult::failures`]. Only the all-failed case is an error.
#[instrument(name = "ensemble.predict", skip_all, fields(models = pool.len()))]
pub fn predict(pool: &ModelPool, features: &FeatureVector) -> Result<EnsembleResult> {
    let start = Instant::now();
    let result = aggregate(pool.predict_all(features));
    metrics::histogram!(telemetry::ENSEMBLE_DURATION_SECONDS).record(start.elapsed().as_secs_f64());

    match &result {
        Ok(r) => {
            if r.is_partial() {
                warn!(
                    failed = r.failures.len(),
                    succeeded = r.model_count,
                    "ensemble voted without some models"
                );
            }
            debug!(
                label = %r.final_label,
                confidence = r.final_confidence,
                average = r.average_confidence,
                "ensemble vote"
            );
        }
        Err(e) => warn!(error = %e, "ensemble produced no prediction"),
    }
    result
}
