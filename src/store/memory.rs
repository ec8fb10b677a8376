use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FeedbackRecord, PredictionId, PredictionRecord, PredictionStore, newest_first};
use crate::Result;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    predictions: RwLock<Vec<PredictionRecord>>,
    feedback: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All feedback received so far, oldest first.
    pub async fn feedback(&self) -> Vec<FeedbackRecord> {
        self.feedback.read().await.clone()
    }

    pub async fn prediction_count(&self) -> usize {
        self.predictions.read().await.len()
    }
}

#[async_trait]
impl PredictionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn record_prediction(&self, record: PredictionRecord) -> Result<PredictionId> {
        let id = record.id;
        self.predictions.write().await.push(record);
        Ok(id)
    }

    async fn history(&self, user_id: &str) -> Result<Vec<PredictionRecord>> {
        let mut records: Vec<_> = self
            .predictions
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn record_feedback(&self, feedback: FeedbackRecord) -> Result<()> {
        self.feedback.write().await.push(feedback);
        Ok(())
    }
}
