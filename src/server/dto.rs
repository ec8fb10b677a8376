//! JSON request/response bodies and error mapping for the HTTP API.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::DhakhtarError;
use crate::service::{Diagnosis, DiagnosisOutcome};
use crate::store::PredictionId;
use crate::types::{Language, ModelFailure};

pub(crate) const DEFAULT_PROBE_TEXT: &str = "Waxaan qabaa qandho iyo madax xanuun";

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

/// Fields are optional so missing ones map to a 400 with our own message.
#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    pub prediction_id: Option<String>,
    pub user_id: Option<String>,
    pub helpful: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProbeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelVote {
    pub label: String,
    pub confidence: f32,
    pub weight: f32,
}

#[derive(Debug, Serialize)]
pub struct DebugInfo {
    pub detected_language: Language,
    pub original_disease: String,
    pub precautions_count: usize,
    pub precaution_match: String,
    pub average_confidence: f64,
    pub models: BTreeMap<String, ModelVote>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ModelFailure>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub disease: String,
    pub confidence: f64,
    pub precautions: Vec<String>,
    pub lang: Language,
    pub prediction_id: Option<PredictionId>,
    pub translated_text: Vec<String>,
    pub debug_info: DebugInfo,
}

impl From<Diagnosis> for PredictResponse {
    fn from(d: Diagnosis) -> Self {
        let models = d
            .ensemble
            .predictions
            .iter()
            .map(|p| {
                (
                    p.model.clone(),
                    ModelVote {
                        label: p.label.clone(),
                        confidence: p.confidence,
                        weight: p.weight,
                    },
                )
            })
            .collect();
        let precaution_match = match &d.precaution_match {
            crate::precautions::MatchKind::Exact => "exact".to_owned(),
            crate::precautions::MatchKind::Partial { key } => format!("partial:{key}"),
            crate::precautions::MatchKind::Generic => "generic".to_owned(),
        };

        Self {
            debug_info: DebugInfo {
                detected_language: d.language,
                original_disease: d.disease_en,
                precautions_count: d.precautions.len(),
                precaution_match,
                average_confidence: d.ensemble.average_confidence,
                models,
                failures: d.ensemble.failures,
            },
            disease: d.disease,
            confidence: d.confidence,
            precautions: d.precautions,
            lang: d.language,
            prediction_id: d.prediction_id,
            translated_text: d.translated_precautions,
        }
    }
}

/// Body returned when the ensemble is not confident enough.
#[derive(Debug, Serialize)]
pub struct UnclearResponse {
    pub error: String,
    pub is_unclear: bool,
    pub confidence_too_low: bool,
    pub confidence: f64,
}

impl UnclearResponse {
    pub fn new(confidence: f64) -> Self {
        Self {
            error: format!(
                "System confidence too low ({:.0}%). Please provide more details.",
                confidence * 100.0
            ),
            is_unclear: true,
            confidence_too_low: true,
            confidence,
        }
    }
}

pub fn outcome_response(outcome: DiagnosisOutcome) -> Response {
    match outcome {
        DiagnosisOutcome::Diagnosed(d) => Json(PredictResponse::from(*d)).into_response(),
        DiagnosisOutcome::Unclear { confidence, .. } => {
            Json(UnclearResponse::new(confidence)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Error body: `{"error": ..}` plus the flag the client keys on.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_unclear: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    model_error: bool,
}

/// HTTP-facing error.
#[derive(Debug)]
pub enum ApiError {
    /// 400 on `/predict`; the client shows it as an unclear answer.
    Unclear(String),
    BadRequest(String),
    /// 500 when no model produced a prediction.
    ModelError,
    Internal(String),
}

impl ApiError {
    /// Map a `/predict` error.
    pub fn from_predict(err: DhakhtarError) -> Self {
        match err {
            DhakhtarError::InvalidInput(msg) => Self::Unclear(msg),
            DhakhtarError::NoPredictionsAvailable { attempted } => {
                error!(attempted, "no model produced a prediction");
                Self::ModelError
            }
            other => Self::internal(other, "An internal server error occurred."),
        }
    }

    /// Log the cause, return a generic message.
    pub fn internal(err: DhakhtarError, message: &str) -> Self {
        error!(error = %err, "request failed");
        Self::Internal(message.to_owned())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Unclear(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    is_unclear: true,
                    model_error: false,
                },
            ),
            Self::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    is_unclear: false,
                    model_error: false,
                },
            ),
            Self::ModelError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Error making prediction with the trained model.".to_owned(),
                    is_unclear: false,
                    model_error: true,
                },
            ),
            Self::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error,
                    is_unclear: false,
                    model_error: false,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclear_message_rounds_percentage() {
        let body = UnclearResponse::new(0.126);
        assert!(body.error.contains("(13%)"));
        assert!(body.is_unclear && body.confidence_too_low);
    }

    #[test]
    fn error_body_omits_false_flags() {
        let json = serde_json::to_value(ErrorBody {
            error: "x".into(),
            is_unclear: false,
            model_error: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"error": "x", "model_error": true}));
    }

    #[test]
    fn bad_features_are_internal_not_unclear() {
        let err =
            ApiError::from_predict(DhakhtarError::InvalidFeatures("feature 1 is not finite".into()));
        assert!(matches!(err, ApiError::Internal(_)));
        let err = ApiError::from_predict(DhakhtarError::InvalidInput("too short".into()));
        assert!(matches!(err, ApiError::Unclear(_)));
    }
}
