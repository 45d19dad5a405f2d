//! Retry and model fallback for LLM calls.
//!
//! The primary model is retried only while the provider reports rate
//! limiting or quota exhaustion. Once it gives up, for whatever reason, the
//! fallback model gets exactly one attempt.

use super::{LlmProvider, is_rate_limit_error};
use crate::config::LlmConfig;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Model selection and retry configuration.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Model tried first.
    pub primary_model: String,
    /// Model tried once after the primary gives up.
    pub fallback_model: String,
    /// Retries of the primary model on rate-limit errors.
    pub max_retries: u32,
    /// Backoff before the first retry in milliseconds.
    pub retry_backoff_ms: u64,
    /// Extra backoff per attempt in milliseconds.
    pub retry_backoff_step_ms: u64,
}

impl FallbackConfig {
    /// Creates a configuration with default retry settings.
    #[must_use]
    pub fn new(primary_model: impl Into<String>, fallback_model: impl Into<String>) -> Self {
        let defaults = LlmConfig::default();
        Self {
            primary_model: primary_model.into(),
            fallback_model: fallback_model.into(),
            max_retries: defaults.max_retries,
            retry_backoff_ms: defaults.retry_backoff_ms,
            retry_backoff_step_ms: defaults.retry_backoff_step_ms,
        }
    }

    /// Builds the configuration from settings, using the given models when
    /// none are configured.
    #[must_use]
    pub fn from_config(config: &LlmConfig, default_primary: &str, default_fallback: &str) -> Self {
        Self {
            primary_model: config
                .primary_model
                .clone()
                .unwrap_or_else(|| default_primary.to_string()),
            fallback_model: config
                .fallback_model
                .clone()
                .unwrap_or_else(|| default_fallback.to_string()),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            retry_backoff_step_ms: config.retry_backoff_step_ms,
        }
    }

    /// Sets the retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets both backoff values.
    #[must_use]
    pub const fn with_backoff(mut self, base_ms: u64, step_ms: u64) -> Self {
        self.retry_backoff_ms = base_ms;
        self.retry_backoff_step_ms = step_ms;
        self
    }

    /// Backoff after the zero-based `attempt` failed.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let step = self
            .retry_backoff_step_ms
            .saturating_mul(u64::from(attempt));
        Duration::from_millis(self.retry_backoff_ms.saturating_add(step))
    }
}

/// Runs a prompt against the primary model, then the fallback model.
pub struct ModelCascade {
    provider: Arc<dyn LlmProvider>,
    config: FallbackConfig,
}

impl ModelCascade {
    /// Creates a cascade over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: FallbackConfig) -> Self {
        Self { provider, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Returns the provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generates a completion, retrying and falling back as configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] whose cause reads
    /// `Primary error: ...\nFallback error: ...` when both models fail.
    pub fn generate(&self, prompt: &str) -> Result<String> {
        let provider = self.provider.name();
        let span = tracing::info_span!(
            "llm.generate",
            provider = provider,
            primary = %self.config.primary_model,
            fallback = %self.config.fallback_model,
        );
        let _enter = span.enter();

        let primary_error = match self.run_primary(prompt) {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };

        tracing::warn!(
            model = %self.config.fallback_model,
            "Primary model failed, trying fallback: {primary_error}"
        );

        self.call(&self.config.fallback_model, "fallback", prompt)
            .map_err(|fallback_error| Error::OperationFailed {
                operation: "llm_generate".to_string(),
                cause: format!("Primary error: {primary_error}\nFallback error: {fallback_error}"),
            })
    }

    fn run_primary(&self, prompt: &str) -> Result<String> {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            let err = match self.call(&self.config.primary_model, "primary", prompt) {
                Ok(text) => return Ok(text),
                Err(err) => err,
            };

            attempt += 1;
            if attempt >= max_attempts || !is_rate_limit_error(&err) {
                return Err(err);
            }

            let backoff = self.config.backoff(attempt - 1);
            metrics::counter!("llm_retries_total", "provider" => self.provider.name())
                .increment(1);
            tracing::warn!(
                attempt,
                backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                "Rate limited by LLM provider, retrying"
            );
            if !backoff.is_zero() {
                std::thread::sleep(backoff);
            }
        }
    }

    fn call(&self, model: &str, role: &'static str, prompt: &str) -> Result<String> {
        let provider = self.provider.name();
        let start = Instant::now();
        let result = self.provider.generate(model, prompt);
        let status = match &result {
            Ok(_) => "success",
            Err(err) if is_rate_limit_error(err) => "rate_limited",
            Err(_) => "error",
        };

        metrics::counter!(
            "llm_requests_total",
            "provider" => provider,
            "role" => role,
            "status" => status
        )
        .increment(1);
        metrics::histogram!("llm_request_duration_ms", "provider" => provider, "role" => role)
            .record(start.elapsed().as_secs_f64() * 1000.0);

        if let Err(err) = &result {
            tracing::debug!(model, role, "LLM call failed: {err}");
        }
        result
    }
}
