//! Language detection and best-effort translation around the classifiers.
//!
//! Classifiers only understand English. Somali symptoms are translated in,
//! labels and advice are translated back out. Translation never fails a
//! request: any provider error degrades to returning the input text.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::Translator;
use crate::types::{Language, LanguageHint};
use crate::{DhakhtarError, Result};

/// Words that mark text as Somali when the detector is unsure.
pub const SOMALI_KEYWORDS: [&str; 8] = [
    "waxaan", "qabaa", "qandho", "madax", "xanuun", "daal", "haraad", "kaadi",
];

/// Sample advice used by [`LanguagePipeline::probe`].
const PROBE_PRECAUTIONS: [&str; 3] = [
    "Take prescribed medications as directed",
    "Get plenty of rest",
    "Drink lots of water",
];

/// Whether `text` contains any [`SOMALI_KEYWORDS`] (case-insensitive substring).
pub fn looks_somali(text: &str) -> bool {
    let lower = text.to_lowercase();
    SOMALI_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Step-by-step translation report for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationProbe {
    pub original_text: String,
    pub translator_available: bool,
    pub steps: Vec<ProbeStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ProbeStep {
    LanguageDetection {
        detected: Language,
        success: bool,
    },
    SomaliToEnglish {
        result: String,
        success: bool,
    },
    EnglishToSomali {
        result: String,
        success: bool,
    },
    PrecautionsTranslation {
        original: Vec<String>,
        translated: Vec<String>,
        success: bool,
    },
}

#[derive(Clone, Default)]
pub struct LanguagePipeline {
    translator: Option<Arc<dyn Translator>>,
    pacing: Duration,
}

impl std::fmt::Debug for LanguagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguagePipeline")
            .field("translator", &self.translator_name())
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl LanguagePipeline {
    pub fn new(translator: Option<Arc<dyn Translator>>) -> Self {
        Self {
            translator,
            pacing: Duration::ZERO,
        }
    }

    /// English only; detection always answers English.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Pause between successive calls when translating a list.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn has_translator(&self) -> bool {
        self.translator.is_some()
    }

    pub fn translator_name(&self) -> Option<&str> {
        self.translator.as_deref().map(|t| t.name())
    }

    /// Language of `text`, honouring a forced hint.
    pub async fn resolve_language(&self, text: &str, hint: LanguageHint) -> Language {
        match hint {
            LanguageHint::Forced(lang) => {
                debug!(%lang, "language forced by request");
                lang
            }
            LanguageHint::Auto => self.detect(text).await,
        }
    }

    /// Detect the language of `text`.
    ///
    /// `so` → Somali, `en` → English, any other code falls back to the
    /// keyword check. Without a translator, or when detection fails, the
    /// answer is English.
    #[instrument(skip_all)]
    pub async fn detect(&self, text: &str) -> Language {
        let Some(translator) = &self.translator else {
            debug!("no translator, assuming English");
            return Language::English;
        };

        match translator.detect(text).await {
            Ok(detection) => match detection.supported() {
                Some(lang) => {
                    debug!(%lang, confidence = ?detection.confidence, "language detected");
                    lang
                }
                None if looks_somali(text) => {
                    info!(detected = %detection.language, "Somali keywords found, treating as Somali");
                    Language::Somali
                }
                None => {
                    debug!(detected = %detection.language, "unsupported language, treating as English");
                    Language::English
                }
            },
            Err(e) => {
                warn!(error = %e, "language detection failed, assuming English");
                Language::English
            }
        }
    }

    /// Translate `text`, returning it unchanged when translation is not
    /// possible or produces nothing.
    pub async fn translate(&self, text: &str, source: Language, target: Language) -> String {
        if source == target {
            return text.to_owned();
        }
        let Some(translator) = &self.translator else {
            return text.to_owned();
        };

        match translator.translate(text, source, target).await {
            Ok(t) if !t.trim().is_empty() => t.trim().to_owned(),
            Ok(_) => {
                warn!(%source, %target, "empty translation, keeping original text");
                text.to_owned()
            }
            Err(e) => {
                warn!(%source, %target, error = %e, "translation failed, keeping original text");
                text.to_owned()
            }
        }
    }

    pub async fn to_english(&self, text: &str, source: Language) -> String {
        self.translate(text, source, Language::English).await
    }

    /// Render English `text` in `target`.
    pub async fn localize(&self, text: &str, target: Language) -> String {
        self.translate(text, Language::English, target).await
    }

    /// Render each English item in `target`, one call per item with the
    /// configured pacing between calls. Order is preserved.
    pub async fn localize_all(&self, items: &[String], target: Language) -> Vec<String> {
        if target == Language::English || self.translator.is_none() {
            return items.to_vec();
        }

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
            out.push(self.localize(item, target).await);
        }
        out
    }

    /// Exercise detection and round-trip translation on `text`.
    pub async fn probe(&self, text: &str) -> Result<TranslationProbe> {
        if self.translator.is_none() {
            return Err(DhakhtarError::NoTranslator);
        }

        let detected = self.detect(text).await;
        let mut steps = vec![ProbeStep::LanguageDetection {
            detected,
            success: true,
        }];

        if detected == Language::Somali {
            let english = self.to_english(text, Language::Somali).await;
            steps.push(ProbeStep::SomaliToEnglish {
                success: english != text,
                result: english.clone(),
            });

            let back = self.localize(&english, Language::Somali).await;
            steps.push(ProbeStep::EnglishToSomali {
                success: back != english,
                result: back,
            });

            let original: Vec<String> = PROBE_PRECAUTIONS.iter().map(|s| (*s).to_owned()).collect();
            let translated = self.localize_all(&original, Language::Somali).await;
            steps.push(ProbeStep::PrecautionsTranslation {
                success: translated.len() == original.len(),
                original,
                translated,
            });
        }

        Ok(TranslationProbe {
            original_text: text.to_owned(),
            translator_available: true,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_check_is_case_insensitive() {
        assert!(looks_somali("Waxaan qabaa QANDHO"));
        assert!(looks_somali("madaxa ayaa i xanuunaya"));
        assert!(!looks_somali("I have a headache"));
    }

    #[tokio::test]
    async fn without_translator_everything_passes_through() {
        let pipeline = LanguagePipeline::disabled();
        assert_eq!(pipeline.detect("waxaan qabaa qandho").await, Language::English);
        assert_eq!(
            pipeline.to_english("qandho", Language::Somali).await,
            "qandho"
        );
        let items = vec!["rest".to_owned()];
        assert_eq!(pipeline.localize_all(&items, Language::Somali).await, items);
        assert!(matches!(
            pipeline.probe("x").await,
            Err(DhakhtarError::NoTranslator)
        ));
    }

    #[tokio::test]
    async fn forced_hint_skips_detection() {
        let pipeline = LanguagePipeline::disabled();
        let lang = pipeline
            .resolve_language("I have a fever", LanguageHint::Forced(Language::Somali))
            .await;
        assert_eq!(lang, Language::Somali);
    }
}
