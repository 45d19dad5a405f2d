//! Per-request correlation ids.
//!
//! Callers may supply their own id in `x-request-id`; anything that is not a
//! short printable token is replaced with a fresh UUID.

use std::future::Future;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Header carrying the correlation id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 64;

/// Correlation data for one analyze request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    request_id: String,
    started: Instant,
}

impl RequestContext {
    /// Creates a context with a generated id.
    #[must_use]
    pub fn new() -> Self {
        Self::from_id(Uuid::new_v4().to_string())
    }

    /// Creates a context with an existing id.
    #[must_use]
    pub fn from_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
        }
    }

    /// Uses the caller's id when it is acceptable, otherwise generates one.
    #[must_use]
    pub fn from_incoming(supplied: Option<&str>) -> Self {
        match supplied.map(str::trim) {
            Some(id) if is_acceptable_id(id) => Self::from_id(id),
            _ => Self::new(),
        }
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

tokio::task_local! {
    static TASK_CONTEXT: RequestContext;
}

/// Runs `fut` with `context` as the current request context.
pub async fn scope_request_context<F, T>(context: RequestContext, fut: F) -> T
where
    F: Future<Output = T>,
{
    TASK_CONTEXT.scope(context, fut).await
}

/// Returns the current request id, if inside a scoped request.
#[must_use]
pub fn current_request_id() -> Option<String> {
    TASK_CONTEXT.try_with(|ctx| ctx.request_id.clone()).ok()
}
