use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tone and focus of the generated summary.
///
/// Crosses the wire as its exact variant name (`"Executive"`, `"Risks"`, ...);
/// matching is case-sensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryStyle {
    #[default]
    Executive,
    Risks,
    Actions,
    Technical,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Executive => "Executive",
            SummaryStyle::Risks => "Risks",
            SummaryStyle::Actions => "Actions",
            SummaryStyle::Technical => "Technical",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub style: SummaryStyle,
}

impl SummarizeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
            style: SummaryStyle::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }
}

/// Successful summarization result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub summary: String,
    /// Character count of the submitted text.
    pub original_length: usize,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub style: SummaryStyle,
}
