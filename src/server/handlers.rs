//! HTTP request handlers.

use super::AppState;
use crate::models::ErrorBody;
use crate::observability::{
    REQUEST_ID_HEADER, RequestContext, current_request_id, scope_request_context,
};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tracing::Instrument;

/// Error returned when the body carries no string `message`.
pub const MISSING_MESSAGE: &str = "Missing 'message' in request";

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

/// Serves the page hosting the analyze form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Serves the page script.
pub async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        SCRIPT_JS,
    )
}

/// `POST /analyze`.
///
/// Echoes a well-formed caller `x-request-id`, or a generated one, on every
/// response.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let supplied = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let context = RequestContext::from_incoming(supplied);
    let request_id = context.request_id().to_string();
    let span = tracing::info_span!("analyze", request_id = %request_id);

    let mut response = scope_request_context(context.clone(), handle_analyze(state, body))
        .instrument(span)
        .await;

    tracing::debug!(
        request_id = %request_id,
        status = response.status().as_u16(),
        elapsed_ms = u64::try_from(context.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Analyze request finished"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn handle_analyze(state: Arc<AppState>, body: String) -> Response {
    let Some(message) = extract_message(&body) else {
        tracing::warn!(
            request_id = current_request_id().as_deref(),
            body_bytes = body.len(),
            "Rejected analyze request without message"
        );
        return error_response(StatusCode::BAD_REQUEST, MISSING_MESSAGE);
    };

    let service = Arc::clone(&state.service);
    let span = tracing::Span::current();
    let result =
        tokio::task::spawn_blocking(move || span.in_scope(|| service.analyze_message(&message)))
            .await;

    match result {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(e) => {
            tracing::error!(
                request_id = current_request_id().as_deref(),
                "Analysis task failed: {e}"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed")
        },
    }
}

/// Pulls a string `message` out of a JSON object body.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}
