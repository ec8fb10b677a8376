//! Model pool behaviour: validation, failure isolation and metrics.

use std::sync::Arc;

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use dhakhtar::ensemble;
use dhakhtar::telemetry;
use dhakhtar::{
    Classifier, DhakhtarError, FeatureVector, LabelPrediction, ModelOutcome, ModelPool, Result,
};

// ============================================================================
// Mock classifiers
// ============================================================================

struct Fixed {
    label: &'static str,
    confidence: f32,
}

impl Classifier for Fixed {
    fn predict(&self, _features: &FeatureVector) -> Result<LabelPrediction> {
        Ok(LabelPrediction::new(self.label, self.confidence))
    }
}

struct Failing;

impl Classifier for Failing {
    fn predict(&self, _features: &FeatureVector) -> Result<LabelPrediction> {
        Err(DhakhtarError::Classifier {
            model: "failing".into(),
            reason: "weights corrupted".into(),
        })
    }
}

struct Panicking;

impl Classifier for Panicking {
    fn predict(&self, _features: &FeatureVector) -> Result<LabelPrediction> {
        panic!("index out of bounds")
    }
}

struct NotANumber;

impl Classifier for NotANumber {
    fn predict(&self, _features: &FeatureVector) -> Result<LabelPrediction> {
        Ok(LabelPrediction::new("Malaria", f32::NAN))
    }
}

struct Overconfident;

impl Classifier for Overconfident {
    fn predict(&self, _features: &FeatureVector) -> Result<LabelPrediction> {
        Ok(LabelPrediction::new("Malaria", 1.7))
    }
}

fn fixed(label: &'static str, confidence: f32) -> Arc<dyn Classifier> {
    Arc::new(Fixed { label, confidence })
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

fn counter_with_label(snapshot: &SnapshotVec, name: &str, key: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(k, _, _, _)| {
            k.kind() == MetricKind::Counter
                && k.key().name() == name
                && k.key().labels().any(|l| l.key() == key && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(c) => *c,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Builder validation
// ============================================================================

#[test]
fn empty_pool_rejected() {
    let err = ModelPool::builder().build().unwrap_err();
    assert!(matches!(err, DhakhtarError::Configuration(_)));
}

#[test]
fn duplicate_names_rejected() {
    let err = ModelPool::builder()
        .add("logreg", 0.5, fixed("Malaria", 0.9))
        .add("logreg", 0.5, fixed("Malaria", 0.9))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn weights_outside_unit_interval_rejected() {
    for weight in [-0.1, 1.5, f32::NAN] {
        let result = ModelPool::builder()
            .add("logreg", weight, fixed("Malaria", 0.9))
            .build();
        assert!(
            matches!(result, Err(DhakhtarError::Configuration(_))),
            "weight {weight} accepted"
        );
    }
}

#[test]
fn weights_need_not_sum_to_one() {
    let pool = ModelPool::builder()
        .add("a", 0.2, fixed("Malaria", 0.9))
        .add("b", 0.2, fixed("Malaria", 0.9))
        .build()
        .unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.names(), vec!["a", "b"]);
}

// ============================================================================
// Prediction
// ============================================================================

#[test]
fn failures_are_isolated_per_model() {
    let pool = ModelPool::builder()
        .add("logreg", 0.3, fixed("Migraine", 0.9))
        .add("forest", 0.3, Arc::new(Failing))
        .add("svm", 0.2, Arc::new(Panicking))
        .add("mlp", 0.2, Arc::new(NotANumber))
        .build()
        .unwrap();

    let outcomes = pool.predict_all(&FeatureVector::zeros(4));
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_success());
    assert!(outcomes[1..].iter().all(|o| !o.is_success()));

    match &outcomes[2] {
        ModelOutcome::Failed(f) => {
            assert_eq!(f.model, "svm");
            assert!(f.reason.contains("index out of bounds"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let result = ensemble::predict(&pool, &FeatureVector::zeros(4)).unwrap();
    assert_eq!(result.final_label, "Migraine");
    assert_eq!(result.final_confidence, 1.0);
    assert_eq!(result.model_count, 1);
    assert_eq!(result.failures.len(), 3);
}

#[test]
fn confidence_is_clamped() {
    let pool = ModelPool::builder()
        .add("hot", 1.0, Arc::new(Overconfident))
        .build()
        .unwrap();
    match &pool.predict_all(&FeatureVector::zeros(1))[0] {
        ModelOutcome::Predicted(p) => assert_eq!(p.confidence, 1.0),
        other => panic!("expected prediction, got {other:?}"),
    }
}

#[test]
fn all_failing_pool_reports_no_predictions() {
    let pool = ModelPool::builder()
        .add("a", 0.5, Arc::new(Failing))
        .add("b", 0.5, Arc::new(Panicking))
        .build()
        .unwrap();
    let err = ensemble::predict(&pool, &FeatureVector::zeros(2)).unwrap_err();
    assert!(matches!(
        err,
        DhakhtarError::NoPredictionsAvailable { attempted: 2 }
    ));
}

#[test]
fn prediction_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let pool = ModelPool::builder()
        .add("logreg", 0.5, fixed("Malaria", 0.8))
        .add("forest", 0.5, Arc::new(Failing))
        .build()
        .unwrap();

    let result = metrics::with_local_recorder(&recorder, || {
        ensemble::predict(&pool, &FeatureVector::zeros(3))
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::MODEL_PREDICTIONS_TOTAL, "status", "ok"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::MODEL_PREDICTIONS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::MODEL_PREDICTIONS_TOTAL, "model", "forest"),
        1
    );
    assert!(has_histogram(&snapshot, telemetry::ENSEMBLE_DURATION_SECONDS));
}
