//! HTTP surface: router, shared state and cross-cutting layers.

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

use crate::problem::{ProblemTranslator, SummaryError};
use crate::service::DocumentSummaryService;
use crate::types::{Environment, DEFAULT_MAX_TEXT_LENGTH};

pub mod summarize;

/// Room left in the body limit for JSON syntax, the title and escapes.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub service: DocumentSummaryService,
    pub translator: ProblemTranslator,
    pub max_text_length: usize,
}

impl AppState {
    pub fn new(service: DocumentSummaryService) -> Self {
        Self {
            service,
            translator: ProblemTranslator::default(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.translator = ProblemTranslator::new(environment);
        self
    }

    pub fn max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let request_id = trace_id(req.headers());
            info_span!(
                "http.request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|_req: &Request<Body>, _span: &tracing::Span| {
            info!("request.start");
        })
        .on_response(
            |res: &Response, latency: std::time::Duration, _span: &tracing::Span| {
                info!(status = %res.status(), latency_ms = %latency.as_millis(), "request.end");
            },
        )
        // Failures are reported once by the orchestrator or the translator.
        .on_failure(());

    Router::new()
        .route("/api/summarize", post(summarize::summarize))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit(state.max_text_length)))
        .layer(middleware::from_fn_with_state(state.clone(), catch_unhandled))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER.clone()))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER.clone(), MakeRequestUuid))
        .with_state(state)
}

/// Largest accepted request body for a given character limit.
///
/// Every in-limit text fits even when each character is written as a
/// surrogate-pair escape (`\uD83D\uDE00`, twelve bytes).
fn body_limit(max_text_length: usize) -> usize {
    max_text_length
        .saturating_mul(12)
        .saturating_add(BODY_OVERHEAD_BYTES)
}

async fn health() -> &'static str {
    "OK"
}

/// Converts a panicking handler into the 500 problem envelope.
async fn catch_unhandled(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let trace_id = trace_id(req.headers());

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let error = SummaryError::unexpected(panic_message(payload.as_ref()));
            state.translator.respond(&error, &path, &trace_id)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic occurred".to_string()
    }
}

/// Correlation id for the current request.
///
/// Normally assigned by the request-id layer; a fresh one is generated when
/// the header is missing.
pub(crate) fn trace_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
