use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_util::sync::CancellationToken;

use super::{trace_id, AppState};
use crate::problem::SummaryError;
use crate::types::SummarizeRequest;

/// `POST /api/summarize`
pub async fn summarize(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Response {
    let path = uri.path();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                SummaryError::InputTooLong {
                    max_length: state.max_text_length,
                }
            } else {
                SummaryError::malformed(rejection.body_text())
            };
            return state.translator.respond(&error, path, &trace_id(&headers));
        }
    };

    if let Err(error) = validate_text(&request.text, state.max_text_length) {
        return state.translator.respond(&error, path, &trace_id(&headers));
    }

    // Dropping the handler future (client gone) cancels the provider call.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match state
        .service
        .summarize(&request.text, request.style, request.title.as_deref(), &cancel)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(error) => state.translator.respond(&error, path, &trace_id(&headers)),
    }
}

/// Reject blank text first, then text longer than `max_length` characters.
pub fn validate_text(text: &str, max_length: usize) -> Result<(), SummaryError> {
    if text.trim().is_empty() {
        return Err(SummaryError::InvalidInput);
    }
    if text.chars().count() > max_length {
        return Err(SummaryError::InputTooLong { max_length });
    }
    Ok(())
}
