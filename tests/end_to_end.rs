//! End-to-end tests.
//!
//! Binds the real router on an ephemeral port with a fake LLM provider and
//! drives it through the HTTP client and the submit handler, the same path
//! the `check` command takes.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use scamguard::llm::{FallbackConfig, LlmProvider, ModelCascade};
use scamguard::masking::SensitiveDataMasker;
use scamguard::server::{MISSING_MESSAGE, router};
use scamguard::ui::{
    AnalyzeTransport, BUSY_LABEL, EMPTY_INPUT_ALERT, HttpAnalyzeClient, MemoryPage,
    NO_SENSITIVE_DATA, REQUEST_FAILED_ALERT, SubmitHandler, SubmitOutcome,
};
use scamguard::{AnalysisService, Error, Result};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Provider that records prompts and answers with a fixed reply.
struct FakeProvider {
    reply: std::result::Result<&'static str, &'static str>,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(cause: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(cause),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl LlmProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .map(ToString::to_string)
            .map_err(|cause| Error::OperationFailed {
                operation: "fake_generate".to_string(),
                cause: cause.to_string(),
            })
    }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_scamguard(provider: Arc<FakeProvider>) -> String {
    let cascade = ModelCascade::new(
        provider,
        FallbackConfig::new("primary", "fallback").with_backoff(0, 0),
    );
    let service = Arc::new(AnalysisService::new(SensitiveDataMasker::new(), cascade));
    format!("http://{}", spawn(router(service, 64 * 1024)).await)
}

/// Transport that counts calls before delegating.
struct CountingTransport {
    inner: HttpAnalyzeClient,
    calls: Arc<AtomicUsize>,
}

impl CountingTransport {
    fn new(base: String) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Self {
            inner: HttpAnalyzeClient::new(base),
            calls: Arc::clone(&calls),
        };
        (transport, calls)
    }
}

impl AnalyzeTransport for CountingTransport {
    async fn analyze(&self, message: &str) -> Result<scamguard::AnalyzeResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.analyze(message).await
    }
}

#[tokio::test]
async fn test_check_renders_masked_message() {
    let provider = FakeProvider::replying(
        "```json\n{\"risk_level\": \"High\", \"reasons\": [\"payment request\"], \"user_advice\": \"Do not pay\"}\n```",
    );
    let base = spawn_scamguard(Arc::clone(&provider)).await;

    let page = MemoryPage::new("Pay now to test@upi or call 9876543210", "Analyze");
    let handler = SubmitHandler::new(page.elements(), HttpAnalyzeClient::new(base));

    assert_eq!(handler.activate().await, SubmitOutcome::Rendered);

    let state = page.snapshot();
    assert_eq!(state.original_text, "Pay now to test@upi or call 9876543210");
    assert_eq!(
        state.masked_markup,
        "Pay now to <span class=\"masked\">[MASKED_UPI]</span> or call \
         <span class=\"masked\">[MASKED_PHONE]</span>"
    );
    assert_eq!(state.list_entries, vec!["Phone Number", "UPI ID"]);
    assert_eq!(
        state.analysis_text,
        "{\n  \"risk_level\": \"High\",\n  \"reasons\": [\n    \"payment request\"\n  ],\n  \"user_advice\": \"Do not pay\"\n}"
    );
    assert!(state.alerts.is_empty());
    assert_eq!(state.trigger_label, "Analyze");
    assert_eq!(state.label_changes, vec![BUSY_LABEL, "Analyze"]);

    let prompts = provider.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Pay now to [MASKED_UPI] or call [MASKED_PHONE]"));
    assert!(!prompts[0].contains("9876543210"));
}

#[tokio::test]
async fn test_clean_message_shows_placeholder_and_text_analysis() {
    let base = spawn_scamguard(FakeProvider::replying("Looks harmless.")).await;

    let page = MemoryPage::new("See you at <b>lunch</b>", "Analyze");
    let handler = SubmitHandler::new(page.elements(), HttpAnalyzeClient::new(base));

    assert_eq!(handler.activate().await, SubmitOutcome::Rendered);

    let state = page.snapshot();
    assert_eq!(state.list_entries, vec![NO_SENSITIVE_DATA]);
    assert_eq!(state.masked_markup, "See you at &lt;b&gt;lunch&lt;/b&gt;");
    assert_eq!(state.analysis_text, "\"Looks harmless.\"");
}

#[tokio::test]
async fn test_model_failure_is_rendered_not_alerted() {
    let base = spawn_scamguard(FakeProvider::failing("upstream down")).await;

    let page = MemoryPage::new("hello", "Analyze");
    let handler = SubmitHandler::new(page.elements(), HttpAnalyzeClient::new(base));

    assert_eq!(handler.activate().await, SubmitOutcome::Rendered);

    let state = page.snapshot();
    assert!(state.alerts.is_empty());
    let analysis: Value = serde_json::from_str(&state.analysis_text).unwrap();
    let text = analysis.as_str().unwrap();
    assert!(text.starts_with("Primary error: "));
    assert!(text.contains("\nFallback error: "));
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let base = spawn_scamguard(FakeProvider::replying("{}")).await;
    let page = MemoryPage::new("   ", "Analyze");
    let (transport, calls) = CountingTransport::new(base);
    let handler = SubmitHandler::new(page.elements(), transport);

    assert_eq!(handler.activate().await, SubmitOutcome::EmptyInput);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let state = page.snapshot();
    assert_eq!(state.alerts, vec![EMPTY_INPUT_ALERT]);
    assert!(state.label_changes.is_empty());
}

#[tokio::test]
async fn test_server_error_alerts_and_restores_trigger() {
    let app = Router::new().route(
        "/analyze",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = format!("http://{}", spawn(app).await);

    let page = MemoryPage::new("hello", "Analyze");
    let (transport, calls) = CountingTransport::new(base);
    let handler = SubmitHandler::new(page.elements(), transport);

    assert_eq!(handler.activate().await, SubmitOutcome::Failed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let state = page.snapshot();
    assert_eq!(state.alerts, vec![REQUEST_FAILED_ALERT]);
    assert_eq!(state.trigger_label, "Analyze");
    assert!(!state.trigger_disabled);
    assert!(state.original_text.is_empty());
}

#[tokio::test]
async fn test_malformed_success_body_is_failure() {
    let app = Router::new().route("/analyze", post(|| async { "not json" }));
    let base = format!("http://{}", spawn(app).await);

    let err = HttpAnalyzeClient::new(base)
        .analyze("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OperationFailed { ref operation, .. } if operation == "analyze_response"));
}

#[tokio::test]
async fn test_missing_message_over_http() {
    let base = spawn_scamguard(FakeProvider::replying("{}")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/analyze"))
        .json(&json!({"text": "hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": MISSING_MESSAGE}));
}
