//! Application configuration
//!
//! One `AppConfig` value is loaded at startup and passed by reference to
//! everything that needs it. The API base URL is an explicit setting; it is
//! never inferred from the runtime environment.

use log::{debug, info};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const APP_DIR_NAME: &str = "email-classifier";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub limits: Limits,
    pub timing: Timing,
    pub messages: Messages,
    pub confidence: ConfidenceThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/classify` path is appended to
    pub base_url: String,
    /// 0 disables the timeout
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_file_size: u64,
    pub max_text_length: usize,
    pub min_text_length: usize,
    pub char_warning_threshold: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            max_text_length: 5000,
            min_text_length: 10,
            char_warning_threshold: 4500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub error_auto_hide_ms: u64,
    /// 0 disables the health probe
    pub health_check_interval_ms: u64,
    pub progress_bar_animation_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            error_auto_hide_ms: 10_000,
            health_check_interval_ms: 30_000,
            progress_bar_animation_ms: 100,
        }
    }
}

impl Timing {
    pub fn error_auto_hide(&self) -> Duration {
        Duration::from_millis(self.error_auto_hide_ms)
    }

    pub fn health_check_interval(&self) -> Option<Duration> {
        (self.health_check_interval_ms > 0)
            .then(|| Duration::from_millis(self.health_check_interval_ms))
    }

    pub fn progress_bar_animation(&self) -> Duration {
        Duration::from_millis(self.progress_bar_animation_ms)
    }
}

/// User-facing texts. Defaults are the product's Portuguese strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub no_input: String,
    pub text_too_short: String,
    pub file_too_large: String,
    pub network_error: String,
    pub server_error: String,
    pub invalid_data: String,
    pub incomplete_response: String,
    pub unknown: String,
    pub copied: String,
    pub copy_failed: String,
    pub api_online: String,
    pub api_offline: String,
    pub processing: String,
    pub classifying: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_input: "Por favor, digite um texto ou envie um arquivo.".to_string(),
            text_too_short: "O texto é muito curto. Digite pelo menos 10 caracteres.".to_string(),
            file_too_large: "Arquivo muito grande. Máximo: 10MB".to_string(),
            network_error:
                "Não foi possível conectar ao servidor. Verifique se o backend está rodando."
                    .to_string(),
            server_error: "Erro interno do servidor. Verifique a chave da API OpenAI.".to_string(),
            invalid_data: "Dados inválidos.".to_string(),
            incomplete_response: "Resposta da API incompleta".to_string(),
            unknown: "Erro desconhecido. Tente novamente.".to_string(),
            copied: "Resposta copiada para a área de transferência!".to_string(),
            copy_failed: "Não foi possível copiar o texto".to_string(),
            api_online: "API está online".to_string(),
            api_offline: "API offline".to_string(),
            processing: "Processando...".to_string(),
            classifying: "Consultando Inteligência Artificial...".to_string(),
        }
    }
}

/// Lower bounds (inclusive) of the confidence colour bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub high: u8,
    pub medium: u8,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self { high: 80, medium: 50 }
    }
}

impl AppConfig {
    /// `<config_dir>/email-classifier/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the config from `path`, or from [`AppConfig::default_path`] when
    /// `path` is `None`. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            debug!("Config file not found, using defaults: path={}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Config loaded: path={}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Invalid(format!("api.base_url '{}': {}", self.api.base_url, e))
        })?;

        if self.limits.min_text_length > self.limits.max_text_length {
            return Err(ConfigError::Invalid(format!(
                "limits.min_text_length ({}) exceeds limits.max_text_length ({})",
                self.limits.min_text_length, self.limits.max_text_length
            )));
        }

        if self.confidence.medium > self.confidence.high || self.confidence.high > 100 {
            return Err(ConfigError::Invalid(format!(
                "confidence thresholds must satisfy medium <= high <= 100 (medium={}, high={})",
                self.confidence.medium, self.confidence.high
            )));
        }

        Ok(())
    }

    pub fn classify_url(&self) -> String {
        format!("{}/classify", self.api.base_url.trim_end_matches('/'))
    }

    /// Health endpoint at the root of the API host.
    pub fn health_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api.base_url)
            .and_then(|base| base.join("/health"))
            .map_err(|e| {
                ConfigError::Invalid(format!("api.base_url '{}': {}", self.api.base_url, e))
            })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.api.request_timeout_secs > 0)
            .then(|| Duration::from_secs(self.api.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.limits.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.limits.min_text_length, 10);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://classifier.example.com/api/v1"

            [messages]
            no_input = "Type something."
            "#,
        )
        .expect("valid config");

        assert_eq!(config.api.base_url, "https://classifier.example.com/api/v1");
        assert_eq!(config.api.request_timeout_secs, 60);
        assert_eq!(config.messages.no_input, "Type something.");
        assert_eq!(config.messages.invalid_data, Messages::default().invalid_data);
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = AppConfig::from_toml_str(
            r#"
            [api]
            base_url = "not a url"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = AppConfig::from_toml_str(
            r#"
            [confidence]
            high = 40
            medium = 60
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn builds_endpoint_urls() {
        let config = AppConfig::default().with_api_base_url("https://api.example.com/api/v1/");
        assert_eq!(config.classify_url(), "https://api.example.com/api/v1/classify");
        assert_eq!(
            config.health_url().expect("valid url").as_str(),
            "https://api.example.com/health"
        );
    }

    #[test]
    fn zero_durations_disable_features() {
        let mut config = AppConfig::default();
        config.api.request_timeout_secs = 0;
        config.timing.health_check_interval_ms = 0;

        assert!(config.request_timeout().is_none());
        assert!(config.timing.health_check_interval().is_none());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err =
            AppConfig::load(Some(Path::new("/nonexistent/email-classifier.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
