//! Loading of offline-trained artifacts (vectorizer, classifiers).
//!
//! Artifacts are JSON documents exported by the training pipeline. They are
//! read once at startup; a malformed artifact is a startup error.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{DhakhtarError, Result};

/// Read and deserialize a JSON artifact.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| DhakhtarError::Artifact {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| DhakhtarError::Artifact {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Build an artifact validation error.
pub(crate) fn invalid(path: &str, reason: impl Into<String>) -> DhakhtarError {
    DhakhtarError::Artifact {
        path: path.to_string(),
        reason: reason.into(),
    }
}
