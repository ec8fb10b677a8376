use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use dhakhtar::store::FeedbackRecord;
use dhakhtar::{JsonlStore, Language, MemoryStore, PredictionId, PredictionRecord, PredictionStore};

fn record(user: &str, disease: &str, minutes: i64) -> PredictionRecord {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    PredictionRecord {
        id: PredictionId::new(),
        user_id: user.into(),
        symptoms_original: "fever and chills".into(),
        language: Language::English,
        prediction_displayed: disease.into(),
        prediction_actual_en: disease.into(),
        probability: 0.8,
        precautions: vec!["Rest".into()],
        timestamp: base + Duration::minutes(minutes),
    }
}

async fn history_is_per_user_and_newest_first(store: &dyn PredictionStore) {
    store.record_prediction(record("amina", "Malaria", 0)).await.unwrap();
    store.record_prediction(record("omar", "Migraine", 5)).await.unwrap();
    let latest = store
        .record_prediction(record("amina", "Typhoid", 10))
        .await
        .unwrap();

    let history = store.history("amina").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, latest);
    assert_eq!(history[0].prediction_actual_en, "Typhoid");
    assert_eq!(history[1].prediction_actual_en, "Malaria");

    assert!(store.history("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_store_history() {
    let store = MemoryStore::new();
    history_is_per_user_and_newest_first(&store).await;
    assert_eq!(store.prediction_count().await, 3);
}

#[tokio::test]
async fn jsonl_store_history() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open(dir.path().join("records")).await.unwrap();
    history_is_per_user_and_newest_first(&store).await;
}

#[tokio::test]
async fn jsonl_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let saved = record("amina", "Malaria", 0);
    {
        let store = JsonlStore::open(dir.path()).await.unwrap();
        store.record_prediction(saved.clone()).await.unwrap();
    }

    let store = JsonlStore::open(dir.path()).await.unwrap();
    assert_eq!(store.history("amina").await.unwrap(), vec![saved]);
}

#[tokio::test]
async fn jsonl_store_skips_corrupt_lines() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open(dir.path()).await.unwrap();
    store.record_prediction(record("amina", "Malaria", 0)).await.unwrap();

    let path = dir.path().join("predictions.jsonl");
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("{not json\n");
    std::fs::write(&path, contents).unwrap();
    store.record_prediction(record("amina", "Typhoid", 1)).await.unwrap();

    let history = store.history("amina").await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn empty_jsonl_store_has_no_history() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open(dir.path()).await.unwrap();
    assert!(store.history("amina").await.unwrap().is_empty());
}

#[tokio::test]
async fn feedback_is_appended() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::open(dir.path()).await.unwrap();
    for helpful in [true, false] {
        store
            .record_feedback(FeedbackRecord {
                prediction_id: PredictionId::new(),
                user_id: "amina".into(),
                helpful,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
    }

    let contents = std::fs::read_to_string(dir.path().join("feedback.jsonl")).unwrap();
    let lines: Vec<FeedbackRecord> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].helpful);
    assert!(!lines[1].helpful);
}

#[test]
fn prediction_ids_serialize_as_plain_strings() {
    let id = PredictionId::new();
    let json = serde_json::to_value(id).unwrap();
    assert_eq!(json, serde_json::Value::String(id.to_string()));
}
