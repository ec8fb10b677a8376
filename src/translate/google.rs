//! Google Cloud Translation (v2 REST) client.
//!
//! See: <https://cloud.google.com/translate/docs/reference/rest/v2/translate>

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Detection, Translator};
use crate::telemetry;
use crate::types::Language;
use crate::{DhakhtarError, Result};

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com";
const PROVIDER: &str = "google";

#[derive(Clone)]
pub struct GoogleTranslateClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl std::fmt::Debug for GoogleTranslateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GoogleTranslateClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }

    async fn detect_inner(&self, text: &str) -> Result<Detection> {
        let body: DetectResponse = self
            .post("/language/translate/v2/detect", &DetectRequest { q: text })
            .await?
            .json()
            .await?;

        // One inner list per query; take the provider's first guess.
        let top = body
            .data
            .detections
            .into_iter()
            .next()
            .and_then(|d| d.into_iter().next())
            .ok_or(DhakhtarError::EmptyResponse)?;
        Ok(Detection {
            language: top.language,
            confidence: top.confidence,
        })
    }

    async fn translate_inner(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let request = TranslateRequest {
            q: text,
            source: source.iso_code(),
            target: target.iso_code(),
            format: "text",
        };
        let body: TranslateResponse = self
            .post("/language/translate/v2", &request)
            .await?
            .json()
            .await?;

        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or(DhakhtarError::EmptyResponse)
    }

    fn record_request(operation: &'static str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::TRANSLATION_REQUESTS_TOTAL,
            "provider" => PROVIDER,
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        debug!(
            operation,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "translation request"
        );
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn detect(&self, text: &str) -> Result<Detection> {
        let start = Instant::now();
        let result = self.detect_inner(text).await;
        Self::record_request("detect", start, result.is_ok());
        result
    }

    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let start = Instant::now();
        let result = self.translate_inner(text, source, target).await;
        Self::record_request("translate", start, result.is_ok());
        result
    }
}

/// Map non-success statuses to errors, keeping Google's error message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(DhakhtarError::AuthenticationFailed),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(DhakhtarError::RateLimited { retry_after })
        }
        code => {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("translation API error: {status}"));
            Err(DhakhtarError::Api {
                status: code,
                message,
            })
        }
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Deserialize)]
struct DetectData {
    detections: Vec<Vec<DetectedLanguage>>,
}

#[derive(Deserialize)]
struct DetectedLanguage {
    language: String,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detection_payload() {
        let body: DetectResponse = serde_json::from_str(
            r#"{"data":{"detections":[[{"language":"so","isReliable":false,"confidence":0.92}]]}}"#,
        )
        .unwrap();
        let top = &body.data.detections[0][0];
        assert_eq!(top.language, "so");
        assert_eq!(top.confidence, Some(0.92));
    }

    #[test]
    fn parses_translation_payload() {
        let body: TranslateResponse = serde_json::from_str(
            r#"{"data":{"translations":[{"translatedText":"I have a fever"}]}}"#,
        )
        .unwrap();
        assert_eq!(body.data.translations[0].translated_text, "I have a fever");
    }

    #[test]
    fn trailing_slash_trimmed_from_base_url() {
        let client = GoogleTranslateClient::with_base_url("k", "http://localhost:9/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9");
    }
}
