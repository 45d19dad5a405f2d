//! LLM client factory functions for CLI commands.
//!
//! Provides builders for creating LLM clients and the analysis service from
//! configuration.

use std::sync::Arc;

use crate::config::{LlmConfig, LlmProviderKind, ScamguardConfig};
use crate::llm::{
    FallbackConfig, GeminiClient, LlmHttpConfig, LlmProvider, ModelCascade, OpenAiClient,
    build_http_client,
};
use crate::masking::SensitiveDataMasker;
use crate::services::AnalysisService;

/// Builds a Gemini client from configuration.
#[must_use]
pub fn build_gemini_client(llm_config: &LlmConfig, api_key: &str) -> GeminiClient {
    let mut client = GeminiClient::new().with_api_key(api_key);
    if let Some(ref endpoint) = llm_config.endpoint {
        client = client.with_endpoint(endpoint);
    }
    client.with_http_client(build_http_client(LlmHttpConfig::from_config(llm_config)))
}

/// Builds an `OpenAI` client from configuration.
#[must_use]
pub fn build_openai_client(llm_config: &LlmConfig, api_key: &str) -> OpenAiClient {
    let mut client = OpenAiClient::new().with_api_key(api_key);
    if let Some(ref endpoint) = llm_config.endpoint {
        client = client.with_endpoint(endpoint);
    }
    client.with_http_client(build_http_client(LlmHttpConfig::from_config(llm_config)))
}

/// Builds the configured provider.
#[must_use]
pub fn build_llm_provider(llm_config: &LlmConfig, api_key: &str) -> Arc<dyn LlmProvider> {
    match llm_config.provider {
        LlmProviderKind::Gemini => Arc::new(build_gemini_client(llm_config, api_key)),
        LlmProviderKind::OpenAi => Arc::new(build_openai_client(llm_config, api_key)),
    }
}

/// Builds the primary/fallback model plan, defaulting models per provider.
#[must_use]
pub fn build_fallback_config(llm_config: &LlmConfig) -> FallbackConfig {
    let (primary, fallback) = match llm_config.provider {
        LlmProviderKind::Gemini => (
            GeminiClient::DEFAULT_MODEL,
            GeminiClient::DEFAULT_FALLBACK_MODEL,
        ),
        LlmProviderKind::OpenAi => (
            OpenAiClient::DEFAULT_MODEL,
            OpenAiClient::DEFAULT_FALLBACK_MODEL,
        ),
    };
    FallbackConfig::from_config(llm_config, primary, fallback)
}

/// Builds the analysis service.
#[must_use]
pub fn build_analysis_service(config: &ScamguardConfig, api_key: &str) -> AnalysisService {
    let cascade = ModelCascade::new(
        build_llm_provider(&config.llm, api_key),
        build_fallback_config(&config.llm),
    );
    AnalysisService::new(
        SensitiveDataMasker::new().with_profile(config.masking_profile),
        cascade,
    )
}
