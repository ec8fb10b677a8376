//! HTTP JSON API and daemon wiring.
//!
//! This module provides:
//! - Configuration types (`config`)
//! - Request/response bodies (`dto`)
//! - The axum router (`routes`)
//! - [`build_service`], which assembles a [`DiagnosisService`] from config
//!
//! # Translator stack
//!
//! When translation is enabled and an API key is available the provider is
//! wrapped as follows (outermost first):
//!
//! ```text
//! CachingTranslator (optional) ──► RetryingTranslator ──► GoogleTranslateClient
//! ```

pub mod config;
pub mod dto;
mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

pub use routes::{cors_layer, router};

use self::config::{Config, Secrets, StoreKind};
use crate::models::ModelPool;
use crate::precautions::PrecautionBook;
use crate::service::{Dhakhtar, DiagnosisService};
use crate::store::{JsonlStore, MemoryStore, PredictionStore};
use crate::translate::{
    CachingTranslator, GoogleTranslateClient, LanguagePipeline, RetryingTranslator, Translator,
};
use crate::vectorizer::{TfidfVectorizer, Vectorizer};
use crate::{DhakhtarError, Result};

/// Load artifacts and collaborators named by `config`.
pub async fn build_service(config: &Config, secrets: &Secrets) -> Result<DiagnosisService> {
    let vectorizer = TfidfVectorizer::load(&config.resolve(&config.models.vectorizer))?;
    let pool = ModelPool::from_artifacts(&config.model_specs(), vectorizer.dimension())?;
    info!(
        models = ?pool.names(),
        features = vectorizer.dimension(),
        "model pool loaded"
    );

    let precautions = match &config.precautions.path {
        Some(path) => PrecautionBook::load(&config.resolve(path))?,
        None => PrecautionBook::default(),
    };

    Dhakhtar::builder()
        .vectorizer(Arc::new(vectorizer))
        .pool(Arc::new(pool))
        .gate(config.gate.to_gate()?)
        .min_symptom_chars(config.gate.min_symptom_chars)
        .precautions(precautions)
        .language(build_language(config, secrets)?)
        .store(build_store(config).await?)
        .build()
}

fn build_language(config: &Config, secrets: &Secrets) -> Result<LanguagePipeline> {
    let settings = &config.translation;
    if !settings.enabled {
        info!("translation disabled by configuration");
        return Ok(LanguagePipeline::disabled());
    }
    let Some(key) = secrets.translate_api_key() else {
        warn!("no translation API key found, serving English only");
        return Ok(LanguagePipeline::disabled());
    };

    let client = match &settings.base_url {
        Some(url) => GoogleTranslateClient::with_base_url(key, url)?,
        None => GoogleTranslateClient::new(key)?,
    };
    let mut translator: Arc<dyn Translator> = Arc::new(RetryingTranslator::new(
        Arc::new(client),
        settings.retry.clone(),
    ));
    if let Some(cache) = &settings.cache {
        translator = Arc::new(CachingTranslator::new(translator, cache));
    }
    info!(provider = translator.name(), "translation enabled");
    Ok(LanguagePipeline::new(Some(translator)).with_pacing(settings.pacing()))
}

async fn build_store(config: &Config) -> Result<Arc<dyn PredictionStore>> {
    match config.store.kind {
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreKind::Jsonl => {
            let path = config.store.path.as_ref().ok_or_else(|| {
                DhakhtarError::Configuration("store.path is required for the jsonl store".into())
            })?;
            Ok(Arc::new(JsonlStore::open(config.resolve(path)).await?))
        }
    }
}

/// Serve the API on `listener` until ctrl-c.
pub async fn serve(
    listener: TcpListener,
    service: Arc<DiagnosisService>,
    cors_origins: &[String],
) -> Result<()> {
    let app = router(service, cors_layer(cors_origins)?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await
        .map_err(|e| DhakhtarError::Http(e.to_string()))
}
