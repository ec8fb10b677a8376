//! Append-only JSON lines files.
//!
//! Layout under the store directory:
//!
//! ```text
//! <dir>/predictions.jsonl   one PredictionRecord per line
//! <dir>/feedback.jsonl      one FeedbackRecord per line
//! ```
//!
//! Writes are serialised through a mutex so lines never interleave.
//! Unreadable lines are skipped with a warning when reading history.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{FeedbackRecord, PredictionId, PredictionRecord, PredictionStore, newest_first};
use crate::{DhakhtarError, Result};

const PREDICTIONS_FILE: &str = "predictions.jsonl";
const FEEDBACK_FILE: &str = "feedback.jsonl";

#[derive(Debug)]
pub struct JsonlStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Open (and create if needed) a store directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| storage_error(&dir, e))?;
        debug!(dir = %dir.display(), "opened JSON lines store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn append<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');

        let path = self.dir.join(file);
        let _guard = self.write_lock.lock().await;
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| storage_error(&path, e))?;
        handle
            .write_all(&line)
            .await
            .map_err(|e| storage_error(&path, e))?;
        handle.flush().await.map_err(|e| storage_error(&path, e))
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> DhakhtarError {
    DhakhtarError::Storage(format!("{}: {err}", path.display()))
}

#[async_trait]
impl PredictionStore for JsonlStore {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn record_prediction(&self, record: PredictionRecord) -> Result<PredictionId> {
        self.append(PREDICTIONS_FILE, &record).await?;
        Ok(record.id)
    }

    async fn history(&self, user_id: &str) -> Result<Vec<PredictionRecord>> {
        let path = self.dir.join(PREDICTIONS_FILE);
        let contents = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&path, e)),
        };

        let mut records = Vec::new();
        for (n, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PredictionRecord>(line) {
                Ok(r) if r.user_id == user_id => records.push(r),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), line = n + 1, error = %e, "skipping unreadable record"),
            }
        }
        newest_first(&mut records);
        Ok(records)
    }

    async fn record_feedback(&self, feedback: FeedbackRecord) -> Result<()> {
        self.append(FEEDBACK_FILE, &feedback).await
    }
}
