//! In-memory cache in front of a translator.
//!
//! Precaution lists and disease names repeat across requests, so most
//! translate calls are served from here. Entries are keyed on a content
//! hash of (operation, languages, text).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;

use super::{Detection, Translator};
use crate::Result;
use crate::telemetry;
use crate::types::Language;

/// Size and lifetime bounds for [`CachingTranslator`].
///
/// Read from the `[translation.cache]` table; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Entry lifetime. Default: 1 day.
    #[serde(rename = "ttl_secs", deserialize_with = "secs")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl CacheConfig {
    /// Create a config with the defaults: 10,000 entries, one day TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached results. Older entries are evicted
    /// once the bound is reached.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set how long an entry stays valid after insertion.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

fn secs<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_secs)
}

/// One cached result. Detection and translation share the key space.
#[derive(Debug, Clone)]
enum Cached {
    Text(String),
    Detection(Detection),
}

/// Caches successful results of an inner [`Translator`]. Errors are never cached.
pub struct CachingTranslator {
    inner: Arc<dyn Translator>,
    cache: Cache<u64, Cached>,
}

impl CachingTranslator {
    /// Wrap `inner` with a fresh, empty cache bounded by `config`.
    pub fn new(inner: Arc<dyn Translator>, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { inner, cache }
    }

    /// Look up `key`, counting a hit or a miss for `operation`.
    async fn lookup(&self, operation: &'static str, key: u64) -> Option<Cached> {
        let hit = self.cache.get(&key).await;
        let name = if hit.is_some() {
            telemetry::CACHE_HITS_TOTAL
        } else {
            telemetry::CACHE_MISSES_TOTAL
        };
        metrics::counter!(name, "operation" => operation).increment(1);
        hit
    }
}

#[async_trait]
impl Translator for CachingTranslator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn detect(&self, text: &str) -> Result<Detection> {
        let key = cache_key("detect", &[text]);
        if let Some(Cached::Detection(d)) = self.lookup("detect", key).await {
            return Ok(d);
        }
        let detection = self.inner.detect(text).await?;
        self.cache
            .insert(key, Cached::Detection(detection.clone()))
            .await;
        Ok(detection)
    }

    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        let key = cache_key("translate", &[source.iso_code(), target.iso_code(), text]);
        if let Some(Cached::Text(t)) = self.lookup("translate", key).await {
            return Ok(t);
        }
        let translated = self.inner.translate(text, source, target).await?;
        self.cache
            .insert(key, Cached::Text(translated.clone()))
            .await;
        Ok(translated)
    }
}

/// Hash `operation` and `parts` in order, so direction matters.
fn cache_key(operation: &str, parts: &[&str]) -> u64 {
    let mut hasher = DefaultHasher::new();
    operation.hash(&mut hasher);
    for p in parts {
        p.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_depends_on_direction() {
        let a = cache_key("translate", &["so", "en", "qandho"]);
        let b = cache_key("translate", &["en", "so", "qandho"]);
        assert_ne!(a, b);
    }

    #[test]
    fn key_depends_on_operation() {
        assert_ne!(
            cache_key("detect", &["qandho"]),
            cache_key("translate", &["qandho"])
        );
    }
}
