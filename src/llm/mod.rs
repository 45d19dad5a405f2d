//! LLM client abstraction.
//!
//! Provides a unified interface for the providers that assess masked
//! messages, plus the retry-then-fallback policy wrapped around them.

mod gemini;
mod openai;
pub mod prompt;
mod resilience;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompt::{SCAM_ANALYSIS_PROMPT, build_analysis_prompt};
pub use resilience::{FallbackConfig, ModelCascade};

use crate::{Error, Result};
use std::time::Duration;

/// Trait for LLM providers.
pub trait LlmProvider: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Generates a completion for `prompt` with the given model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] when the API answers with a
    /// non-success status, and [`Error::OperationFailed`] for transport or
    /// decoding failures.
    fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

/// HTTP client configuration for LLM providers.
#[derive(Debug, Clone, Copy)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            connect_timeout_ms: 5_000,
        }
    }
}

impl LlmHttpConfig {
    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub const fn from_config(config: &crate::config::LlmConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }
}

/// Builds a blocking HTTP client for LLM requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build LLM HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Returns true if `err` reports quota exhaustion or rate limiting.
#[must_use]
pub fn is_rate_limit_error(err: &Error) -> bool {
    match err {
        Error::RequestFailed { status, body } => *status == 429 || mentions_rate_limit(body),
        Error::OperationFailed { cause, .. } => mentions_rate_limit(cause),
        Error::InvalidInput(_) => false,
    }
}

fn mentions_rate_limit(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["resource_exhausted", "quota", "rate limit", "rate_limit", "too many requests"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Turns raw model output into a JSON value.
///
/// Strips code fences, then tries the whole text, then the outermost
/// `{...}` span. Text that is not JSON comes back as a JSON string.
#[must_use]
pub fn parse_model_output(raw: &str) -> serde_json::Value {
    let cleaned = strip_code_fences(raw);

    if let Ok(value) = serde_json::from_str(cleaned) {
        return value;
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&cleaned[start..=end]) {
                return value;
            }
        }
    }

    serde_json::Value::String(cleaned.to_string())
}

/// Removes a leading ```` ``` ```` or ```` ```json ```` fence and a trailing fence.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}
