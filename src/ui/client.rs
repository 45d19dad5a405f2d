//! Client for the analyze endpoint.

use crate::models::{AnalyzeRequest, AnalyzeResponse};
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Sends one message to the analysis service.
pub trait AnalyzeTransport: Send + Sync {
    /// Posts `message` and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] on a non-success status and
    /// [`Error::OperationFailed`] on transport or decoding failures.
    fn analyze(&self, message: &str) -> impl Future<Output = Result<AnalyzeResponse>> + Send;
}

/// HTTP client for `POST /analyze`.
#[derive(Debug, Clone)]
pub struct HttpAnalyzeClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnalyzeClient {
    /// Default server URL.
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000";

    /// Creates a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Sets a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Failed to build analyze HTTP client: {err}");
                reqwest::Client::new()
            });
        self
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/analyze", self.base_url.trim_end_matches('/'))
    }
}

impl Default for HttpAnalyzeClient {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl AnalyzeTransport for HttpAnalyzeClient {
    async fn analyze(&self, message: &str) -> Result<AnalyzeResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&AnalyzeRequest::new(message))
            .send()
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "analyze_request".to_string(),
                cause: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<AnalyzeResponse>()
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "analyze_response".to_string(),
                cause: e.to_string(),
            })
    }
}
