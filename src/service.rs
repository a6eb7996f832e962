//! Summarization orchestration: prompt, provider call, classification, response.

use crate::prompt::build_prompt;
use crate::provider::ChatProvider;
use crate::problem::SummaryError;
use crate::types::{SummarizeResponse, SummaryStyle};
use crate::UpstreamFailure;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Receives one event per summarization outcome.
pub trait SummaryObserver: Send + Sync + 'static {
    fn on_summarized(&self, style: SummaryStyle, original_length: usize, summary_length: usize, model: &str);

    fn on_failed(&self, style: SummaryStyle, cause: &UpstreamFailure);
}

/// Default observer: structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SummaryObserver for TracingObserver {
    fn on_summarized(&self, style: SummaryStyle, original_length: usize, summary_length: usize, model: &str) {
        info!(
            style = %style,
            original_length,
            summary_length,
            model = %model,
            "Summarized document"
        );
    }

    fn on_failed(&self, style: SummaryStyle, cause: &UpstreamFailure) {
        error!(
            style = %style,
            provider = cause.provider(),
            cause = %cause,
            "Document summary failed"
        );
    }
}

/// Turns validated document text into a [`SummarizeResponse`].
///
/// Text bounds are checked by the request handler before this runs.
#[derive(Clone)]
pub struct DocumentSummaryService {
    provider: Arc<dyn ChatProvider>,
    observer: Arc<dyn SummaryObserver>,
}

impl DocumentSummaryService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self::with_observer(provider, Arc::new(TracingObserver))
    }

    pub fn with_observer(provider: Arc<dyn ChatProvider>, observer: Arc<dyn SummaryObserver>) -> Self {
        Self { provider, observer }
    }

    pub async fn summarize(
        &self,
        text: &str,
        style: SummaryStyle,
        title: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SummarizeResponse, SummaryError> {
        let prompt = build_prompt(text, Some(style), title);

        let completion = match self.provider.complete(&prompt, cancel).await {
            Ok(completion) => completion,
            Err(cause) => {
                self.observer.on_failed(style, &cause);
                return Err(SummaryError::service_unavailable(cause));
            }
        };
        let generated_at = Utc::now();

        let original_length = text.chars().count();
        self.observer.on_summarized(
            style,
            original_length,
            completion.summary_text.chars().count(),
            &completion.model,
        );

        Ok(SummarizeResponse {
            summary: completion.summary_text,
            original_length,
            model: completion.model,
            generated_at,
            style,
        })
    }
}
