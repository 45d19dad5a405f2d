//! `OpenAI` client.

use super::LlmProvider;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// `OpenAI` LLM client. Works with any chat-completions compatible endpoint.
pub struct OpenAiClient {
    /// API key.
    api_key: Option<String>,
    /// API endpoint.
    endpoint: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.openai.com/v1";

    /// Default primary model.
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";

    /// Default fallback model.
    pub const DEFAULT_FALLBACK_MODEL: &'static str = "gpt-4o-mini";

    /// Creates a new `OpenAI` client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: None,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = client;
        self
    }

    /// Checks if the model is a GPT-5 family model.
    ///
    /// GPT-5 models use `max_completion_tokens` instead of `max_tokens`
    /// and only support temperature=1 (default).
    fn is_gpt5_model(model: &str) -> bool {
        model.starts_with("gpt-5") || model.starts_with("o1") || model.starts_with("o3")
    }

    /// Builds the request body for a model.
    fn build_request(model: &str, prompt: &str) -> ChatCompletionRequest {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        if Self::is_gpt5_model(model) {
            ChatCompletionRequest {
                model: model.to_string(),
                messages,
                max_tokens: None,
                max_completion_tokens: Some(1024),
                temperature: None,
            }
        } else {
            ChatCompletionRequest {
                model: model.to_string(),
                messages,
                max_tokens: Some(1024),
                max_completion_tokens: None,
                temperature: Some(0.2),
            }
        }
    }

    /// Makes a request to the `OpenAI` API.
    fn request(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::OperationFailed {
                operation: "openai_request".to_string(),
                cause: "OPENAI_API_KEY not set".to_string(),
            })?;

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.endpoint.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&Self::build_request(model, prompt))
            .send()
            .map_err(|e| Error::OperationFailed {
                operation: "openai_request".to_string(),
                cause: e.without_url().to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(Error::RequestFailed { status, body });
        }

        let response: ChatCompletionResponse =
            response.json().map_err(|e| Error::OperationFailed {
                operation: "openai_response".to_string(),
                cause: e.without_url().to_string(),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::OperationFailed {
                operation: "openai_response".to_string(),
                cause: "No choices in response".to_string(),
            })
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        self.request(model, prompt)
    }
}

/// Request to the Chat Completions API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    /// Token limit for GPT-4 and earlier models.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Token limit for GPT-5/o1/o3 models.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// A message in the chat.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the Chat Completions API.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// A choice in the response.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
