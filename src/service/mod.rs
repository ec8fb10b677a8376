//! The request pipeline: text in, localized diagnosis out.

mod builder;
mod diagnose;

pub use builder::{DEFAULT_MIN_SYMPTOM_CHARS, Dhakhtar, DhakhtarBuilder};
pub use diagnose::DiagnosisService;

use serde::{Deserialize, Serialize};

use crate::precautions::MatchKind;
use crate::store::PredictionId;
use crate::types::{EnsembleResult, Language, LanguageHint};
use crate::version::BuildInfo;

/// User id recorded when a request does not name one.
pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, Default)]
pub struct DiagnoseRequest {
    pub symptoms: String,
    pub lang: LanguageHint,
    pub user_id: Option<String>,
}

impl DiagnoseRequest {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            ..Self::default()
        }
    }

    pub fn lang(mut self, lang: LanguageHint) -> Self {
        self.lang = lang;
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// A confident diagnosis, localized for the caller.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    /// Disease name in `language`.
    pub disease: String,
    /// Disease label as predicted by the ensemble.
    pub disease_en: String,
    /// Ensemble vote share.
    pub confidence: f64,
    /// Advice in `language`.
    pub precautions: Vec<String>,
    /// Somali rendering of the advice for English requests; the same list
    /// as `precautions` for Somali requests.
    pub translated_precautions: Vec<String>,
    /// Language of the answer.
    pub language: Language,
    pub precaution_match: MatchKind,
    /// `None` when the prediction could not be stored.
    pub prediction_id: Option<PredictionId>,
    pub ensemble: EnsembleResult,
}

#[derive(Debug, Clone)]
pub enum DiagnosisOutcome {
    Diagnosed(Box<Diagnosis>),
    /// The ensemble answered but below the confidence threshold.
    Unclear {
        confidence: f64,
        threshold: f64,
        ensemble: EnsembleResult,
    },
}

impl DiagnosisOutcome {
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Self::Diagnosed(d) => Some(d),
            Self::Unclear { .. } => None,
        }
    }

    pub fn is_unclear(&self) -> bool {
        matches!(self, Self::Unclear { .. })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub prediction_id: String,
    pub user_id: String,
    pub helpful: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub translator_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
    pub models: Vec<String>,
    pub vectorizer_dimension: usize,
    pub store: String,
    pub confidence_threshold: f64,
    pub build: BuildInfo,
}
