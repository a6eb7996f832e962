//! Classified failures and their RFC 7807 problem envelope.

use crate::types::Environment;
use crate::UpstreamFailure;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Caller-facing message for upstream provider failures.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The AI service is temporarily unavailable. Please try again later.";

const PRODUCTION_UNEXPECTED_DETAIL: &str = "Please try again later or contact support";

/// A failed summarization request, classified for translation.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("text is empty or whitespace")]
    InvalidInput,

    #[error("text exceeds {max_length} characters")]
    InputTooLong { max_length: usize },

    #[error("request body is not valid: {reason}")]
    MalformedRequest { reason: String },

    #[error("{message}")]
    ServiceUnavailable {
        message: String,
        #[source]
        source: UpstreamFailure,
    },

    #[error("unexpected failure: {message}")]
    Unexpected { message: String },
}

impl SummaryError {
    pub fn service_unavailable(source: UpstreamFailure) -> Self {
        SummaryError::ServiceUnavailable {
            message: SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            source,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        SummaryError::MalformedRequest {
            reason: reason.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        SummaryError::Unexpected {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SummaryError::InvalidInput
            | SummaryError::InputTooLong { .. }
            | SummaryError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            SummaryError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            SummaryError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SummaryError::InvalidInput | SummaryError::MalformedRequest { .. } => "Invalid request",
            SummaryError::InputTooLong { .. } => "Request too long",
            SummaryError::ServiceUnavailable { .. } => "Service unavailable",
            SummaryError::Unexpected { .. } => "An unexpected error occurred",
        }
    }
}

/// Problem envelope written for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    pub trace_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<String>,
}

/// Maps [`SummaryError`] onto [`ProblemDetails`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemTranslator {
    environment: Environment,
}

impl ProblemTranslator {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Build the envelope for `error` raised while serving `path`.
    ///
    /// Client errors are logged at warn level and unexpected failures at
    /// error level. Service-unavailable failures are not logged here; the
    /// orchestrator already reported the upstream cause.
    pub fn translate(&self, error: &SummaryError, path: &str, trace_id: &str) -> ProblemDetails {
        let status = error.status_code();
        let mut exception_details = None;

        let detail = match error {
            SummaryError::InvalidInput => "Text cannot be empty or whitespace".to_string(),
            SummaryError::InputTooLong { max_length } => format!(
                "Text too long, cannot be > {} characters long",
                group_thousands(*max_length)
            ),
            SummaryError::MalformedRequest { reason } => format!("Request body is not valid: {reason}"),
            SummaryError::ServiceUnavailable { message, .. } => message.clone(),
            SummaryError::Unexpected { message } => {
                if self.environment.is_development() {
                    exception_details = Some(message.clone());
                    message.clone()
                } else {
                    PRODUCTION_UNEXPECTED_DETAIL.to_string()
                }
            }
        };

        match error {
            SummaryError::Unexpected { message } => {
                error!(path = %path, trace_id = %trace_id, error = %message, "An unhandled failure occurred while processing request");
            }
            SummaryError::ServiceUnavailable { .. } => {}
            _ => {
                warn!(path = %path, trace_id = %trace_id, status = status.as_u16(), detail = %detail, "Rejected summarize request");
            }
        }

        ProblemDetails {
            problem_type: "about:blank".to_string(),
            title: error.title().to_string(),
            status: status.as_u16(),
            detail,
            instance: path.to_string(),
            trace_id: trace_id.to_string(),
            exception_details,
        }
    }

    pub fn respond(&self, error: &SummaryError, path: &str, trace_id: &str) -> Response {
        self.translate(error, path, trace_id).into_response()
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)], Json(self)).into_response()
    }
}

/// `16384` -> `"16,384"`.
fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
