//! HTTP server.
//!
//! Routes:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Analyze page |
//! | GET | `/static/script.js` | Page script |
//! | POST | `/analyze` | Mask a message and assess it |

mod handlers;

pub use handlers::MISSING_MESSAGE;

use crate::services::AnalysisService;
use crate::{Error, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, header};
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Shared state for request handlers.
pub struct AppState {
    /// The analysis service.
    pub service: Arc<AnalysisService>,
}

/// Builds the application router.
pub fn router(service: Arc<AnalysisService>, max_body_bytes: usize) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/", get(handlers::index))
        .route("/static/script.js", get(handlers::script))
        .route("/analyze", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; style-src 'self' 'unsafe-inline'; frame-ancestors 'none'",
            ),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` on `listener` until ctrl-c.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr().map_err(|e| Error::OperationFailed {
        operation: "local_addr".to_string(),
        cause: e.to_string(),
    })?;
    tracing::info!(%addr, "Scamguard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "serve".to_string(),
            cause: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{FallbackConfig, LlmProvider, ModelCascade};
    use crate::masking::SensitiveDataMasker;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct FixedProvider;

    impl LlmProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn generate(&self, _model: &str, _prompt: &str) -> crate::Result<String> {
            Ok(r#"{"risk_level": "High", "reasons": ["urgency"], "user_advice": "Ignore it"}"#
                .to_string())
        }
    }

    fn app() -> Router {
        let cascade = ModelCascade::new(Arc::new(FixedProvider), FallbackConfig::new("a", "b"));
        let service = Arc::new(AnalysisService::new(SensitiveDataMasker::new(), cascade));
        router(service, 1024)
    }

    fn post_analyze(body: impl Into<Body>) -> Request<Body> {
        Request::post("/analyze")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_returns_four_fields() {
        let response = app()
            .oneshot(post_analyze(r#"{"message": "My SSN is 123-45-6789"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");

        let body = json_body(response).await;
        assert_eq!(
            body,
            json!({
                "user_view": "My SSN is 123-45-6789",
                "ai_view": "My SSN is [MASKED_SSN]",
                "detected_sensitive_data": ["SSN"],
                "analysis": {"risk_level": "High", "reasons": ["urgency"], "user_advice": "Ignore it"}
            })
        );
    }

    #[tokio::test]
    async fn test_caller_request_id_is_echoed() {
        let request = Request::post("/analyze")
            .header("content-type", "application/json")
            .header("x-request-id", "trace-123")
            .body(Body::from(r#"{"message": "hi"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "trace-123");
    }

    #[tokio::test]
    async fn test_missing_message_is_bad_request() {
        let response = app()
            .oneshot(post_analyze(r#"{"text": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": MISSING_MESSAGE}));
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let response = app().oneshot(post_analyze("{oops")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let message = "a".repeat(2048);
        let body = serde_json::to_string(&json!({ "message": message })).unwrap();
        let response = app().oneshot(post_analyze(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_index_page_carries_page_elements() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        for id in [
            "analyze-btn",
            "user-input",
            "original-text",
            "masked-text",
            "sensitive-list",
            "analysis-json",
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing element {id}");
        }
    }

    #[tokio::test]
    async fn test_script_is_served_as_javascript() {
        let response = app()
            .oneshot(
                Request::get("/static/script.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/javascript")
        );
    }

    #[tokio::test]
    async fn test_get_analyze_not_allowed() {
        let response = app()
            .oneshot(Request::get("/analyze").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
