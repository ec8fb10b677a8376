//! Configuration loading for dhakhtard.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.dhakhtar/config.toml` (user)
//! 3. `/etc/dhakhtar/config.toml` (system)
//!
//! Relative artifact paths are resolved against the directory of the config
//! file that was loaded.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.dhakhtar/secrets.toml` (user, must be 0600)
//! 2. `/etc/dhakhtar/secrets.toml` (system, must be 0600)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::ensemble::{ConfidenceGate, DEFAULT_CONFIDENCE_THRESHOLD, GateMetric};
use crate::models::ModelSpec;
use crate::service::DEFAULT_MIN_SYMPTOM_CHARS;
use crate::translate::{CacheConfig, RetryConfig};
use crate::{DhakhtarError, Result};

/// Environment variable consulted when no secrets file provides a key.
pub const TRANSLATE_API_KEY_ENV: &str = "DHAKHTAR_TRANSLATE_API_KEY";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub precautions: PrecautionsConfig,
    /// Directory of the loaded file; relative paths resolve against it.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:5000".to_string()
}

/// Vectorizer and classifier artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub vectorizer: PathBuf,
    #[serde(rename = "entry")]
    pub entries: Vec<ModelSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub metric: GateMetric,
    #[serde(default = "default_min_symptom_chars")]
    pub min_symptom_chars: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            metric: GateMetric::default(),
            min_symptom_chars: default_min_symptom_chars(),
        }
    }
}

impl GateConfig {
    pub fn to_gate(&self) -> Result<ConfidenceGate> {
        Ok(ConfidenceGate::new(self.threshold)?.with_metric(self.metric))
    }
}

fn default_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_min_symptom_chars() -> usize {
    DEFAULT_MIN_SYMPTOM_CHARS
}

/// Translation provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// Use the translation provider when an API key is available (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Override the provider endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Pause between consecutive precaution translations (default: 300ms).
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Response cache; omit the section to disable caching.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            pacing_ms: default_pacing_ms(),
            retry: RetryConfig::default(),
            cache: None,
        }
    }
}

impl TranslationConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_pacing_ms() -> u64 {
    300
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Jsonl,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    /// Directory for the `jsonl` store.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrecautionsConfig {
    /// JSON table replacing the built-in precautions.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub translation: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DhakhtarError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let mut config = Self::parse(&content).map_err(|e| {
            DhakhtarError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse TOML text. Relative paths stay relative to the working directory.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(DhakhtarError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".dhakhtar").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/dhakhtar/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(DhakhtarError::Configuration(
            "No config file found. Create ~/.dhakhtar/config.toml or /etc/dhakhtar/config.toml"
                .to_string(),
        ))
    }

    /// Resolve `path` against the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Model specs with resolved artifact paths.
    pub fn model_specs(&self) -> Vec<ModelSpec> {
        self.models
            .entries
            .iter()
            .map(|spec| ModelSpec {
                path: self.resolve(&spec.path),
                ..spec.clone()
            })
            .collect()
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the env var may still apply).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".dhakhtar").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/dhakhtar/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DhakhtarError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            DhakhtarError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            DhakhtarError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(DhakhtarError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Translation API key, falling back to [`TRANSLATE_API_KEY_ENV`].
    pub fn translate_api_key(&self) -> Option<String> {
        self.translation
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(TRANSLATE_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [models]
        vectorizer = "artifacts/vectorizer.json"

        [[models.entry]]
        name = "logreg"
        path = "artifacts/logreg.json"
        weight = 1.0
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:5000");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.gate.threshold, 0.20);
        assert_eq!(config.gate.metric, GateMetric::VoteShare);
        assert_eq!(config.gate.min_symptom_chars, 5);
        assert!(config.translation.enabled);
        assert_eq!(config.translation.pacing(), Duration::from_millis(300));
        assert!(config.translation.cache.is_none());
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert!(config.precautions.path.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8080"
            cors_origins = ["http://localhost:3000"]

            [models]
            vectorizer = "/srv/models/vectorizer.json"

            [[models.entry]]
            name = "logreg"
            path = "/srv/models/logreg.json"
            weight = 0.4

            [[models.entry]]
            name = "forest"
            path = "/srv/models/forest.json"
            weight = 0.3

            [[models.entry]]
            name = "svm"
            path = "/srv/models/svm.json"
            weight = 0.3

            [gate]
            threshold = 0.35
            metric = "average_confidence"
            min_symptom_chars = 8

            [translation]
            base_url = "http://translate.internal"
            pacing_ms = 0

            [translation.retry]
            max_attempts = 5
            initial_delay_ms = 100

            [translation.cache]
            max_entries = 500
            ttl_secs = 60

            [store]
            kind = "jsonl"
            path = "/var/lib/dhakhtar"

            [precautions]
            path = "/srv/precautions.json"
        "#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.cors_origins, ["http://localhost:3000"]);
        assert_eq!(config.models.entries.len(), 3);
        assert_eq!(config.models.entries[1].name, "forest");
        assert_eq!(config.gate.metric, GateMetric::AverageConfidence);
        assert_eq!(config.gate.to_gate().unwrap().threshold(), 0.35);
        assert_eq!(config.translation.retry.max_attempts, 5);
        assert_eq!(
            config.translation.retry.initial_delay,
            Duration::from_millis(100)
        );
        let cache = config.translation.cache.unwrap();
        assert_eq!(cache.max_entries, 500);
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert_eq!(config.store.kind, StoreKind::Jsonl);
        assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/dhakhtar")));
    }

    #[test]
    fn models_section_is_required() {
        assert!(Config::parse("[server]\naddress = \"127.0.0.1:1\"").is_err());
    }

    #[test]
    fn invalid_threshold_rejected_when_building_gate() {
        let mut config = Config::parse(MINIMAL).unwrap();
        config.gate.threshold = 2.0;
        assert!(config.gate.to_gate().is_err());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, MINIMAL).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        let specs = config.model_specs();
        assert_eq!(specs[0].path, dir.path().join("artifacts/logreg.json"));
        assert_eq!(
            config.resolve(Path::new("/abs/vectorizer.json")),
            PathBuf::from("/abs/vectorizer.json")
        );
    }

    #[test]
    fn parse_secrets() {
        let secrets: Secrets = toml::from_str("[translation]\napi_key = \"gt-key\"").unwrap();
        assert_eq!(secrets.translate_api_key(), Some("gt-key".to_string()));
    }

    #[test]
    fn config_not_found_returns_error() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[cfg(unix)]
    #[test]
    fn world_readable_secrets_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[translation]\napi_key = \"k\"").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(Secrets::check_permissions(&path).is_err());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        assert!(Secrets::check_permissions(&path).is_ok());
    }
}
