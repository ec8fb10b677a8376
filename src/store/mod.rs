//! Prediction and feedback persistence.
//!
//! [`PredictionStore`] is the boundary to whatever document store a
//! deployment uses. Two implementations ship with the crate:
//! [`MemoryStore`] for tests and single-process use, and [`JsonlStore`]
//! which appends JSON lines to files in a directory.

mod jsonl;
mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use crate::types::Language;
use crate::{DhakhtarError, Result};

/// Identifier assigned to a stored prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(Uuid);

impl PredictionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PredictionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PredictionId {
    type Err = DhakhtarError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DhakhtarError::InvalidInput("Invalid prediction_id format".into()))
    }
}

/// One diagnosis as shown to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: PredictionId,
    pub user_id: String,
    pub symptoms_original: String,
    /// Language the answer was displayed in.
    pub language: Language,
    pub prediction_displayed: String,
    pub prediction_actual_en: String,
    pub probability: f64,
    pub precautions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Whether a user found a prediction helpful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub prediction_id: PredictionId,
    pub user_id: String,
    pub helpful: bool,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &str;

    async fn record_prediction(&self, record: PredictionRecord) -> Result<PredictionId>;

    /// All predictions for `user_id`, newest first.
    async fn history(&self, user_id: &str) -> Result<Vec<PredictionRecord>>;

    async fn record_feedback(&self, feedback: FeedbackRecord) -> Result<()>;
}

/// Newest first; ties keep insertion order reversed.
fn newest_first(records: &mut [PredictionRecord]) {
    records.reverse();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_id_round_trips_through_text() {
        let id = PredictionId::new();
        let parsed: PredictionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_prediction_id_is_invalid_input() {
        let err = "not-a-uuid".parse::<PredictionId>().unwrap_err();
        assert!(matches!(err, DhakhtarError::InvalidInput(_)));
    }
}
