use super::types::{AzureErrorResponse, ChatCompletionsRequest, ChatCompletionsResponse};
use crate::provider::{ChatCompletion, ChatProvider};
use crate::types::{AzureOpenAiConfig, Message};
use crate::{Error, UpstreamFailure};
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const PROVIDER_NAME: &str = "Azure OpenAI";

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes documents concisely.";

/// Azure OpenAI chat-completions provider.
pub struct AzureOpenAiProvider {
    client: Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiProvider {
    /// Create a new provider. The HTTP client is built once and reused.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Convert a prompt into the chat-completions request body.
    fn convert_request(&self, prompt: &str) -> ChatCompletionsRequest {
        ChatCompletionsRequest {
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    async fn send(&self, prompt: &str) -> Result<ChatCompletion, Error> {
        let body = self.convert_request(prompt);
        debug!(
            deployment = %self.config.deployment,
            prompt_length = prompt.chars().count(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.config.chat_completions_url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &error_text));
        }

        let raw = response.text().await?;
        let parsed: ChatCompletionsResponse = serde_json::from_str(&raw)?;
        let usage = parsed.usage.clone().unwrap_or_default();
        debug!(
            response_id = parsed.id.as_deref().unwrap_or("-"),
            finish_reason = parsed.finish_reason().unwrap_or("-"),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "chat completion received"
        );
        let summary_text = parsed
            .first_content()
            .ok_or_else(|| Error::malformed("response contained no completion text"))?
            .to_string();
        let model = parsed
            .model
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.config.deployment.clone());

        Ok(ChatCompletion { summary_text, model })
    }

    fn classify_status(status: StatusCode, body: &str) -> Error {
        let message = AzureErrorResponse::message_from_body(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimit,
            _ => Error::provider(PROVIDER_NAME, status.as_u16(), message),
        }
    }
}

#[async_trait::async_trait]
impl ChatProvider for AzureOpenAiProvider {
    async fn complete(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatCompletion, UpstreamFailure> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.send(prompt) => result,
        };

        result.map_err(|err| {
            debug!(deployment = %self.config.deployment, error = %err, "Azure OpenAI error");
            UpstreamFailure::new(PROVIDER_NAME, err)
        })
    }
}
