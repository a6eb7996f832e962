use crate::UpstreamFailure;
use tokio_util::sync::CancellationToken;

/// Generated text plus the identifier of the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub summary_text: String,
    pub model: String,
}

impl ChatCompletion {
    pub fn new(summary_text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            summary_text: summary_text.into(),
            model: model.into(),
        }
    }
}

/// A chat-completion backend: submit one prompt, receive one completion.
///
/// Implementations make exactly one provider call per invocation and never
/// retry. Every transport or provider failure is returned as an
/// [`UpstreamFailure`]. When `cancel` fires the in-flight call is abandoned.
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync + 'static {
    async fn complete(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatCompletion, UpstreamFailure>;
}
