use crate::types::Message;
use serde::{Deserialize, Serialize};

/// Azure OpenAI chat-completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionsRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Azure OpenAI chat-completions response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionsResponse {
    /// Text of the first choice, if the provider returned any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Azure OpenAI error response.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureErrorResponse {
    pub error: ErrorDetails,
}

/// Error details from Azure OpenAI.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

impl AzureErrorResponse {
    /// Best-effort extraction of a readable message from an error body.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<AzureErrorResponse>(body) {
            Ok(parsed) => match parsed.error.code {
                Some(code) => format!("{code}: {}", parsed.error.message),
                None => parsed.error.message,
            },
            Err(_) => body.chars().take(500).collect(),
        }
    }
}
