//! Google Gemini client.

use super::LlmProvider;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Gemini LLM client using the `generateContent` REST API.
pub struct GeminiClient {
    /// API key.
    api_key: Option<String>,
    /// API endpoint.
    endpoint: String,
    /// API version path segment.
    api_version: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com";

    /// Default API version.
    pub const DEFAULT_API_VERSION: &'static str = "v1";

    /// Default primary model.
    pub const DEFAULT_MODEL: &'static str = "models/gemini-2.5-pro";

    /// Default fallback model.
    pub const DEFAULT_FALLBACK_MODEL: &'static str = "models/gemini-2.5-flash";

    /// Creates a new Gemini client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: None,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            api_version: Self::DEFAULT_API_VERSION.to_string(),
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

    /// Sets the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = client;
        self
    }

    /// Builds the `generateContent` URL for a model.
    ///
    /// Accepts both `models/gemini-2.5-pro` and `gemini-2.5-pro`.
    fn url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/{}/models/{model}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Makes a request to the Gemini API.
    fn request(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::OperationFailed {
                operation: "gemini_request".to_string(),
                cause: "GEMINI_API_KEY not set".to_string(),
            })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| Error::OperationFailed {
                operation: "gemini_request".to_string(),
                cause: e.without_url().to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(Error::RequestFailed { status, body });
        }

        let response: GenerateContentResponse =
            response.json().map_err(|e| Error::OperationFailed {
                operation: "gemini_response".to_string(),
                cause: e.without_url().to_string(),
            })?;

        response.text().ok_or_else(|| Error::OperationFailed {
            operation: "gemini_response".to_string(),
            cause: "No candidates in response".to_string(),
        })
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        self.request(model, prompt)
    }
}

/// Request to the `generateContent` API.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

/// A content block in a request or candidate.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// A part of a content block.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

/// Response from the `generateContent` API.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// A candidate in the response.
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}
