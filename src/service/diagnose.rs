use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::{
    ANONYMOUS_USER, DiagnoseRequest, Diagnosis, DiagnosisOutcome, FeedbackRequest, HealthReport,
};
use crate::ensemble::{self, ConfidenceGate, GateDecision};
use crate::models::ModelPool;
use crate::precautions::PrecautionBook;
use crate::store::{FeedbackRecord, PredictionId, PredictionRecord, PredictionStore};
use crate::telemetry;
use crate::translate::{LanguagePipeline, TranslationProbe};
use crate::types::{Language, LanguageHint};
use crate::vectorizer::Vectorizer;
use crate::version::BuildInfo;
use crate::{DhakhtarError, Result};

/// Symptom text → localized diagnosis.
///
/// Cheap to share behind an `Arc`; every collaborator is read-only or
/// internally synchronised.
pub struct DiagnosisService {
    pub(super) vectorizer: Arc<dyn Vectorizer>,
    pub(super) pool: Arc<ModelPool>,
    pub(super) gate: ConfidenceGate,
    pub(super) precautions: PrecautionBook,
    pub(super) language: LanguagePipeline,
    pub(super) store: Arc<dyn PredictionStore>,
    pub(super) min_symptom_chars: usize,
}

impl std::fmt::Debug for DiagnosisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosisService")
            .field("models", &self.pool.names())
            .field("gate", &self.gate)
            .field("language", &self.language)
            .field("store", &self.store.name())
            .finish_non_exhaustive()
    }
}

impl DiagnosisService {
    pub fn pool(&self) -> &ModelPool {
        &self.pool
    }

    pub fn gate(&self) -> &ConfidenceGate {
        &self.gate
    }

    pub fn precautions(&self) -> &PrecautionBook {
        &self.precautions
    }

    pub fn language(&self) -> &LanguagePipeline {
        &self.language
    }

    /// Run the full pipeline for one request.
    ///
    /// Errors: [`DhakhtarError::InvalidInput`] for too-short symptoms and
    /// [`DhakhtarError::NoPredictionsAvailable`] when every model failed.
    /// Low confidence is an `Ok` outcome.
    #[instrument(skip_all, fields(lang = ?request.lang))]
    pub async fn diagnose(&self, request: DiagnoseRequest) -> Result<DiagnosisOutcome> {
        let result = self.run(request).await;
        let outcome = match &result {
            Ok(DiagnosisOutcome::Diagnosed(_)) => "diagnosed",
            Ok(DiagnosisOutcome::Unclear { .. }) => "unclear",
            Err(DhakhtarError::NoPredictionsAvailable { .. }) => "model_error",
            Err(DhakhtarError::InvalidInput(_)) => "invalid",
            Err(_) => "error",
        };
        metrics::counter!(telemetry::DIAGNOSES_TOTAL, "outcome" => outcome).increment(1);
        result
    }

    async fn run(&self, request: DiagnoseRequest) -> Result<DiagnosisOutcome> {
        let symptoms = request.symptoms.trim();
        if symptoms.chars().count() < self.min_symptom_chars {
            return Err(DhakhtarError::InvalidInput(format!(
                "Please provide more detailed symptoms (at least {} characters).",
                self.min_symptom_chars
            )));
        }

        let detected = self.language.resolve_language(symptoms, request.lang).await;
        let english = self.language.to_english(symptoms, detected).await;

        let features = self.vectorizer.transform(&english)?;
        let ensemble = ensemble::predict(&self.pool, &features)?;

        if let GateDecision::LowConfidence {
            confidence,
            threshold,
        } = self.gate.evaluate(&ensemble)
        {
            info!(
                label = %ensemble.final_label,
                confidence,
                threshold,
                "confidence below threshold"
            );
            return Ok(DiagnosisOutcome::Unclear {
                confidence,
                threshold,
                ensemble,
            });
        }

        let label = ensemble.final_label.clone();
        let matched = self.precautions.lookup(&label);

        let somali = match matched.somali_advice() {
            Some(native) => native.to_vec(),
            None => {
                self.language
                    .localize_all(matched.advice(), Language::Somali)
                    .await
            }
        };

        let (disease, precautions, translated_precautions) = match detected {
            Language::English => (label.clone(), matched.advice().to_vec(), somali),
            Language::Somali => {
                let name = match matched.somali_name() {
                    Some(name) => name.to_owned(),
                    None => self.language.localize(&label, Language::Somali).await,
                };
                (name, somali.clone(), somali)
            }
        };

        let confidence = ensemble.final_confidence;
        let record = PredictionRecord {
            id: PredictionId::new(),
            user_id: request
                .user_id
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(ANONYMOUS_USER)
                .to_owned(),
            symptoms_original: symptoms.to_owned(),
            language: detected,
            prediction_displayed: disease.clone(),
            prediction_actual_en: label.clone(),
            probability: confidence,
            precautions: precautions.clone(),
            timestamp: Utc::now(),
        };
        let prediction_id = match self.store.record_prediction(record).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "failed to record prediction");
                None
            }
        };

        info!(
            label = %label,
            %disease,
            confidence,
            language = %detected,
            models = ensemble.model_count,
            "diagnosis complete"
        );

        Ok(DiagnosisOutcome::Diagnosed(Box::new(Diagnosis {
            disease,
            disease_en: label,
            confidence,
            precautions,
            translated_precautions,
            language: detected,
            precaution_match: matched.kind,
            prediction_id,
            ensemble,
        })))
    }

    /// Past predictions for `user_id`, newest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<PredictionRecord>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(DhakhtarError::InvalidInput("User ID is required".into()));
        }
        self.store.history(user_id).await
    }

    pub async fn feedback(&self, request: FeedbackRequest) -> Result<()> {
        let user_id = request.user_id.trim();
        if user_id.is_empty() || request.prediction_id.trim().is_empty() {
            return Err(DhakhtarError::InvalidInput("Missing required fields".into()));
        }
        let prediction_id: PredictionId = request.prediction_id.parse()?;
        self.store
            .record_feedback(FeedbackRecord {
                prediction_id,
                user_id: user_id.to_owned(),
                helpful: request.helpful,
                timestamp: Utc::now(),
            })
            .await
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            translator_available: self.language.has_translator(),
            translator: self.language.translator_name().map(str::to_owned),
            models: self.pool.names().into_iter().map(str::to_owned).collect(),
            vectorizer_dimension: self.vectorizer.dimension(),
            store: self.store.name().to_owned(),
            confidence_threshold: self.gate.threshold(),
            build: BuildInfo::current(),
        }
    }

    /// Step-by-step translation report. Fails with
    /// [`DhakhtarError::NoTranslator`] when translation is disabled.
    pub async fn translation_probe(&self, text: &str) -> Result<TranslationProbe> {
        self.language.probe(text).await
    }

    /// Language the pipeline would use for `text` under `hint`.
    pub async fn detect_language(&self, text: &str, hint: LanguageHint) -> Language {
        self.language.resolve_language(text, hint).await
    }
}
