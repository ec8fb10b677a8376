//! HTTP handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use super::dto::{
    ApiError, DEFAULT_PROBE_TEXT, FeedbackBody, HistoryQuery, MessageResponse, PredictRequest,
    ProbeRequest, outcome_response,
};
use crate::service::{DiagnoseRequest, DiagnosisService, FeedbackRequest};
use crate::types::LanguageHint;
use crate::{DhakhtarError, Result};

type AppState = Arc<DiagnosisService>;

/// Build the API router.
pub fn router(service: Arc<DiagnosisService>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/history", get(history))
        .route("/feedback", post(feedback))
        .route("/health", get(health))
        .route("/test-translation-debug", post(translation_debug))
        .layer(cors)
        .with_state(service)
}

/// CORS for the configured origins; an empty list allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| DhakhtarError::Configuration(format!("invalid CORS origin '{o}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}

async fn predict(
    State(service): State<AppState>,
    Json(body): Json<PredictRequest>,
) -> std::result::Result<Response, ApiError> {
    let request = DiagnoseRequest {
        symptoms: body.symptoms,
        lang: body
            .lang
            .as_deref()
            .map(LanguageHint::parse)
            .unwrap_or_default(),
        user_id: body.user_id,
    };
    let outcome = service
        .diagnose(request)
        .await
        .map_err(ApiError::from_predict)?;
    Ok(outcome_response(outcome))
}

async fn history(
    State(service): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> std::result::Result<Response, ApiError> {
    let Some(user_id) = query.user_id.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::BadRequest("User ID is required".into()));
    };
    let records = service
        .history(&user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Could not retrieve prediction history"))?;
    Ok(Json(records).into_response())
}

async fn feedback(
    State(service): State<AppState>,
    Json(body): Json<FeedbackBody>,
) -> std::result::Result<Response, ApiError> {
    let (Some(prediction_id), Some(user_id), Some(helpful)) =
        (body.prediction_id, body.user_id, body.helpful)
    else {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    };

    let request = FeedbackRequest {
        prediction_id,
        user_id,
        helpful,
    };
    match service.feedback(request).await {
        Ok(()) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "Feedback received",
            }),
        )
            .into_response()),
        Err(DhakhtarError::InvalidInput(msg)) => Err(ApiError::BadRequest(msg)),
        Err(e) => Err(ApiError::internal(e, "Could not process feedback")),
    }
}

async fn health(State(service): State<AppState>) -> Response {
    Json(service.health()).into_response()
}

async fn translation_debug(
    State(service): State<AppState>,
    body: Bytes,
) -> std::result::Result<Response, ApiError> {
    // An absent or unparsable body probes the default sentence.
    let text = serde_json::from_slice::<ProbeRequest>(&body)
        .ok()
        .and_then(|b| b.text)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROBE_TEXT.to_owned());

    match service.translation_probe(&text).await {
        Ok(report) => Ok(Json(report).into_response()),
        Err(DhakhtarError::NoTranslator) => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "original_text": text,
                "translator_available": false,
                "steps": [],
                "error": "Translator not available",
            })),
        )
            .into_response()),
        Err(e) => Err(ApiError::internal(e, "Translation probe failed")),
    }
}
