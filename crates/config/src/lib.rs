//! Configuration loading, validation, and management for PromptWire.
//!
//! Loads configuration from `~/.promptwire/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.promptwire/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google AI (Vertex PaLM) settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Context memory settings
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Credentials, model selection, and sampling parameters for Google AI.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Bearer credential for the prediction endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Google Cloud project the models are served from
    #[serde(default)]
    pub project_id: String,

    /// Generation model id ("text-bison" or "chat-bison")
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model id
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Override the prediction base URL (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "text-bison".into()
}
fn default_embed_model() -> String {
    "textembedding-gecko".into()
}
fn default_max_tokens() -> u32 {
    300
}
fn default_temperature() -> f64 {
    0.45
}
fn default_top_p() -> f64 {
    1.0
}
fn default_top_k() -> u32 {
    40
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: String::new(),
            model: default_model(),
            embed_model: default_embed_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("api_key", &redact(&self.api_key))
            .field("project_id", &self.project_id)
            .field("model", &self.model)
            .field("embed_model", &self.embed_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Remote memory service queried before vector memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Enable the in-process vector memory context source
    #[serde(default = "default_true")]
    pub vector_enabled: bool,

    /// Maximum fragments recalled per request
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,

    /// Minimum cosine similarity for a note to be recalled
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Notes loaded into vector memory at startup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_recall_limit() -> usize {
    5
}
fn default_min_score() -> f32 {
    0.5
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            vector_enabled: true,
            recall_limit: default_recall_limit(),
            min_score: default_min_score(),
            notes: vec![],
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.promptwire/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `PROMPTWIRE_API_KEY`
    /// - `PROMPTWIRE_PROJECT`
    /// - `PROMPTWIRE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (usually `std::env::var`).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("PROMPTWIRE_API_KEY") {
            self.google.api_key = Some(key);
        }
        if let Some(project) = lookup("PROMPTWIRE_PROJECT") {
            self.google.project_id = project;
        }
        if let Some(model) = lookup("PROMPTWIRE_MODEL") {
            self.google.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".promptwire")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.google;
        if !(0.0..=1.0).contains(&g.temperature) {
            return Err(ConfigError::ValidationError(
                "google.temperature must be between 0.0 and 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&g.top_p) {
            return Err(ConfigError::ValidationError(
                "google.top_p must be between 0.0 and 1.0".into(),
            ));
        }
        if g.top_k == 0 {
            return Err(ConfigError::ValidationError("google.top_k must be >= 1".into()));
        }
        if g.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "google.max_tokens must be >= 1".into(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.memory.min_score) {
            return Err(ConfigError::ValidationError(
                "memory.min_score must be between -1.0 and 1.0".into(),
            ));
        }
        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.google.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.google.model, "text-bison");
        assert_eq!(config.google.embed_model, "textembedding-gecko");
        assert_eq!(config.google.max_tokens, 300);
        assert_eq!(config.google.top_k, 40);
        assert!(config.memory.vector_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.google.model, config.google.model);
        assert_eq!(parsed.memory.recall_limit, config.memory.recall_limit);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.google.temperature = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.google.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().google.model, "text-bison");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[google]
api_key = "k-123"
project_id = "my-project"
model = "chat-bison"
temperature = 0.9

[memory]
remote_url = "http://localhost:8080/memory"
recall_limit = 2
notes = ["The user prefers metric units"]
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.google.project_id, "my-project");
        assert_eq!(config.google.model, "chat-bison");
        assert!((config.google.temperature - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.google.top_k, 40);
        assert_eq!(config.memory.recall_limit, 2);
        assert_eq!(config.memory.remote_url.as_deref(), Some("http://localhost:8080/memory"));
        assert_eq!(config.memory.notes.len(), 1);
        assert!(config.has_api_key());
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[google\nmodel = ").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_take_priority() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "PROMPTWIRE_API_KEY" => Some("env-key".into()),
            "PROMPTWIRE_MODEL" => Some("chat-bison".into()),
            _ => None,
        });
        assert_eq!(config.google.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.google.model, "chat-bison");
        assert!(config.google.project_id.is_empty());
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut config = AppConfig::default();
        config.google.api_key = Some("super-secret".into());
        let printed = format!("{config:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("text-bison"));
        assert!(toml_str.contains("textembedding-gecko"));
    }
}
