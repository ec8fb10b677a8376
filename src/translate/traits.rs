//! Translation provider trait.
//!
//! Decorators ([`RetryingTranslator`](super::RetryingTranslator),
//! [`CachingTranslator`](super::CachingTranslator)) implement the same trait
//! and wrap an inner `Arc<dyn Translator>`, so they stack in any order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::Language;

/// Language detected by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Raw ISO 639-1 code as reported by the provider. May name a language
    /// the service does not support.
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Detection {
    /// The detected language, if it is one the service supports.
    pub fn supported(&self) -> Option<Language> {
        Language::from_iso(&self.language)
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    async fn detect(&self, text: &str) -> Result<Detection>;

    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String>;
}
