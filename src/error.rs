//! Dhakhtar error types

use std::time::Duration;

/// Dhakhtar error types
#[derive(Debug, thiserror::Error)]
pub enum DhakhtarError {
    // Network / upstream service errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("empty response from upstream service")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // Model errors
    #[error("failed to load artifact {path}: {reason}")]
    Artifact { path: String, reason: String },

    #[error("feature shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A feature vector could not be built from vectorizer output.
    #[error("invalid features: {0}")]
    InvalidFeatures(String),

    /// A single classifier could not produce a usable prediction.
    ///
    /// The model pool turns this into an omission; it never aborts the ensemble.
    #[error("classifier '{model}' failed: {reason}")]
    Classifier { model: String, reason: String },

    /// Every model in the pool failed for this request.
    #[error("no predictions available ({attempted} models attempted)")]
    NoPredictionsAvailable { attempted: usize },

    // Configuration / infrastructure errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("no translator configured")]
    NoTranslator,
}

impl DhakhtarError {
    /// Whether this error is worth retrying against the same upstream service.
    ///
    /// Transport failures, rate limits, 5xx responses and empty bodies are
    /// transient. Everything else (auth, validation, model errors) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } | Self::EmptyResponse => true,
            Self::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Server-provided retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DhakhtarError {
    fn from(err: reqwest::Error) -> Self {
        DhakhtarError::Http(err.to_string())
    }
}

/// Result type alias for Dhakhtar operations
pub type Result<T> = std::result::Result<T, DhakhtarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        for status in [500, 502, 503, 504] {
            let err = DhakhtarError::Api {
                status,
                message: "upstream".into(),
            };
            assert!(err.is_transient(), "{status} should be transient");
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        let err = DhakhtarError::Api {
            status: 400,
            message: "bad request".into(),
        };
        assert!(!err.is_transient());
        assert!(!DhakhtarError::AuthenticationFailed.is_transient());
        assert!(!DhakhtarError::NoPredictionsAvailable { attempted: 3 }.is_transient());
        assert!(!DhakhtarError::ShapeMismatch { expected: 4, actual: 2 }.is_transient());
    }

    #[test]
    fn retry_after_only_from_rate_limit() {
        let hint = Duration::from_secs(2);
        assert_eq!(
            DhakhtarError::RateLimited {
                retry_after: Some(hint)
            }
            .retry_after(),
            Some(hint)
        );
        assert_eq!(DhakhtarError::Http("reset".into()).retry_after(), None);
    }

    #[test]
    fn no_predictions_message_names_attempts() {
        let err = DhakhtarError::NoPredictionsAvailable { attempted: 4 };
        assert!(err.to_string().contains("4 models attempted"));
    }
}
