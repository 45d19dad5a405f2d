//! Wire types for the analyze endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// The raw user message.
    pub message: String,
}

impl AnalyzeRequest {
    /// Creates a request for `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// The message exactly as the user sent it.
    pub user_view: String,
    /// The message as the model saw it, with `[MASKED_<label>]` tokens.
    pub ai_view: String,
    /// Labels of the sensitive data found.
    pub detected_sensitive_data: Vec<String>,
    /// Whatever the model returned, usually an object with `risk_level`,
    /// `reasons` and `user_advice`, but possibly a plain string.
    pub analysis: serde_json::Value,
}

/// Error body returned for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable error.
    pub error: String,
}
