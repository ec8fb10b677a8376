//! Telemetry metric name constants.
//!
//! Centralised metric names for dhakhtar operations. The daemon (or an
//! embedding application) installs its own `metrics` recorder; without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `dhakhtar_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model`: classifier name in the pool (e.g. "logreg", "forest")
//! - `provider`: translation provider name (e.g. "google")
//! - `operation`: capability invoked (e.g. "detect", "translate")
//! - `status`: outcome: "ok" or "error"
//! - `outcome`: diagnosis category: "diagnosed", "unclear", "model_error", "invalid"

/// Per-model prediction attempts inside the pool.
///
/// Labels: `model`, `status` ("ok" | "error").
pub const MODEL_PREDICTIONS_TOTAL: &str = "dhakhtar_model_predictions_total";

/// Time spent running the whole pool plus the vote, in seconds.
pub const ENSEMBLE_DURATION_SECONDS: &str = "dhakhtar_ensemble_duration_seconds";

/// Diagnosis requests by result category.
///
/// Labels: `outcome`.
pub const DIAGNOSES_TOTAL: &str = "dhakhtar_diagnoses_total";

/// Requests sent to the translation provider.
///
/// Labels: `provider`, `operation`, `status`.
pub const TRANSLATION_REQUESTS_TOTAL: &str = "dhakhtar_translation_requests_total";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`, `operation`.
pub const RETRIES_TOTAL: &str = "dhakhtar_retries_total";

/// Translation cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "dhakhtar_cache_hits_total";

/// Translation cache misses.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "dhakhtar_cache_misses_total";
