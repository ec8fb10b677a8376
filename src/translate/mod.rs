//! Language detection and translation.
//!
//! ```text
//! LanguagePipeline ──► CachingTranslator ──► RetryingTranslator ──► GoogleTranslateClient
//! ```

mod cache;
mod google;
mod pipeline;
mod retry;
mod traits;

pub use cache::{CacheConfig, CachingTranslator};
pub use google::GoogleTranslateClient;
pub use pipeline::{
    LanguagePipeline, ProbeStep, SOMALI_KEYWORDS, TranslationProbe, looks_somali,
};
pub use retry::{RetryConfig, RetryingTranslator};
pub use traits::{Detection, Translator};
