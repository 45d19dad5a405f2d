//! Configuration management.
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file, then environment variables (a `.env` file is loaded first by the
//! binary).

use crate::masking::MaskingProfile;
use crate::observability::LogFormat;
use crate::{Error, Result};
use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

/// Main configuration for scamguard.
#[derive(Debug, Clone, Default)]
pub struct ScamguardConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// LLM provider settings.
    pub llm: LlmConfig,
    /// Masking profile.
    pub masking_profile: MaskingProfile,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Metrics settings.
    pub metrics: MetricsSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Resolves the bind address.
    ///
    /// `host` may be an IPv4 or bare IPv6 literal, or a hostname such as
    /// `localhost`; the first resolved address is used.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| Error::InvalidInput(format!("bad bind address: {e}")))?
            .next()
            .ok_or_else(|| {
                Error::InvalidInput(format!("bad bind address: {} did not resolve", self.host))
            })
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider to use.
    pub provider: LlmProviderKind,
    /// API key (can be an environment variable reference like `${GEMINI_API_KEY}`).
    pub api_key: Option<String>,
    /// Base URL override.
    pub endpoint: Option<String>,
    /// Model tried first.
    pub primary_model: Option<String>,
    /// Model tried once when the primary model fails.
    pub fallback_model: Option<String>,
    /// Retries of the primary model on rate-limit errors.
    pub max_retries: u32,
    /// Backoff before the first retry in milliseconds.
    pub retry_backoff_ms: u64,
    /// Extra backoff added per attempt in milliseconds.
    pub retry_backoff_step_ms: u64,
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            api_key: None,
            endpoint: None,
            primary_model: None,
            fallback_model: None,
            max_retries: 2,
            retry_backoff_ms: 1_000,
            retry_backoff_step_ms: 2_000,
            timeout_ms: 60_000,
            connect_timeout_ms: 5_000,
        }
    }
}

impl LlmConfig {
    /// Returns the configured API key, or an error naming the variable to set.
    ///
    /// `${VAR}` references are expanded through `lookup`.
    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let key = match self.api_key.as_deref() {
            Some(value) => match value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
                Some(var) => lookup(var),
                None => Some(value.to_string()),
            },
            None => lookup(self.provider.api_key_env()),
        };

        key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            Error::InvalidInput(format!(
                "{} not found. Check your .env file.",
                self.provider.api_key_env()
            ))
        })
    }
}

/// Available LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProviderKind {
    /// Google Gemini.
    #[default]
    Gemini,
    /// `OpenAI` or any compatible chat completions API.
    OpenAi,
}

impl LlmProviderKind {
    /// Parses a provider string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" | "open-ai" => Self::OpenAi,
            _ => Self::Gemini,
        }
    }

    /// Environment variable holding the provider's API key.
    #[must_use]
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive, e.g. `info,scamguard=debug`.
    pub filter: Option<String>,
}

/// Metrics settings.
#[derive(Debug, Clone)]
pub struct MetricsSettings {
    /// Whether to expose a Prometheus listener.
    pub enabled: bool,
    /// Listener port.
    pub port: u16,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Server section.
    pub server: Option<ConfigFileServer>,
    /// LLM section.
    pub llm: Option<ConfigFileLlm>,
    /// Masking section.
    pub masking: Option<ConfigFileMasking>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
    /// Metrics section.
    pub metrics: Option<ConfigFileMetrics>,
}

/// Server section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileServer {
    /// Bind host.
    pub host: Option<String>,
    /// Bind port.
    pub port: Option<u16>,
    /// Body limit.
    pub max_body_bytes: Option<usize>,
}

/// LLM section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLlm {
    /// Provider name.
    pub provider: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Base URL.
    pub endpoint: Option<String>,
    /// Primary model.
    pub model: Option<String>,
    /// Fallback model.
    pub fallback_model: Option<String>,
    /// Retries.
    pub max_retries: Option<u32>,
    /// Initial backoff.
    pub retry_backoff_ms: Option<u64>,
    /// Backoff step.
    pub retry_backoff_step_ms: Option<u64>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// Masking section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileMasking {
    /// `core` or `extended`.
    pub profile: Option<String>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive.
    pub filter: Option<String>,
}

/// Metrics section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileMetrics {
    /// Enable the Prometheus listener.
    pub enabled: Option<bool>,
    /// Listener port.
    pub port: Option<u16>,
}

impl ScamguardConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `scamguard/config.toml` in the platform config directory and
    /// returns defaults when it is missing or unreadable.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let path = base_dirs.config_dir().join("scamguard").join("config.toml");
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring unreadable config: {e}");
                Self::default()
            },
        }
    }

    /// Converts a `ConfigFile` to `ScamguardConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(limit) = server.max_body_bytes {
                config.server.max_body_bytes = limit;
            }
        }
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                config.llm.provider = LlmProviderKind::parse(&provider);
            }
            config.llm.api_key = llm.api_key;
            config.llm.endpoint = llm.endpoint;
            config.llm.primary_model = llm.model;
            config.llm.fallback_model = llm.fallback_model;
            if let Some(v) = llm.max_retries {
                config.llm.max_retries = v;
            }
            if let Some(v) = llm.retry_backoff_ms {
                config.llm.retry_backoff_ms = v;
            }
            if let Some(v) = llm.retry_backoff_step_ms {
                config.llm.retry_backoff_step_ms = v;
            }
            if let Some(v) = llm.timeout_ms {
                config.llm.timeout_ms = v;
            }
            if let Some(v) = llm.connect_timeout_ms {
                config.llm.connect_timeout_ms = v;
            }
        }
        if let Some(profile) = file.masking.and_then(|m| m.profile) {
            config.masking_profile = MaskingProfile::parse(&profile);
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
            config.logging.filter = logging.filter;
        }
        if let Some(metrics) = file.metrics {
            if let Some(enabled) = metrics.enabled {
                config.metrics.enabled = enabled;
            }
            if let Some(port) = metrics.port {
                config.metrics.port = port;
            }
        }

        config
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SCAMGUARD_*` overrides read through `lookup`.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("SCAMGUARD_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SCAMGUARD_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = v;
        }
        if let Some(v) = lookup("SCAMGUARD_LLM_PROVIDER") {
            self.llm.provider = LlmProviderKind::parse(&v);
        }
        if let Some(v) = lookup("SCAMGUARD_LLM_ENDPOINT") {
            self.llm.endpoint = Some(v);
        }
        if let Some(v) = lookup("SCAMGUARD_LLM_MODEL") {
            self.llm.primary_model = Some(v);
        }
        if let Some(v) = lookup("SCAMGUARD_LLM_FALLBACK_MODEL") {
            self.llm.fallback_model = Some(v);
        }
        if let Some(v) = lookup("SCAMGUARD_LLM_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.llm.max_retries = v;
        }
        if let Some(v) = lookup("SCAMGUARD_LLM_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.llm.timeout_ms = v;
        }
        if let Some(v) = lookup("SCAMGUARD_MASKING_PROFILE") {
            self.masking_profile = MaskingProfile::parse(&v);
        }
        if let Some(v) = lookup("SCAMGUARD_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&v);
        }
        if let Some(v) = lookup("SCAMGUARD_METRICS_ENABLED") {
            self.metrics.enabled = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = lookup("SCAMGUARD_METRICS_PORT").and_then(|v| v.parse().ok()) {
            self.metrics.port = v;
        }
        self
    }
}

/// Renders an API key for logs: its first six characters and a mask.
#[must_use]
pub fn redact_api_key(key: &str) -> String {
    let prefix: String = key.chars().take(6).collect();
    format!("{prefix} *****")
}
