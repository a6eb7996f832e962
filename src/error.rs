use thiserror::Error;

/// Errors raised inside a chat provider adapter.
///
/// These never cross the gateway boundary on their own; every adapter wraps
/// them into an [`UpstreamFailure`] before returning.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Provider error: {provider} returned {status} - {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Request cancelled before the provider responded")]
    Cancelled,
}

impl Error {
    pub fn provider(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Error::Auth(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedResponse(message.into())
    }
}

/// The single failure kind a [`ChatProvider`](crate::ChatProvider) may return.
///
/// Carries the adapter-level cause for logging. Callers above the gateway
/// must not show it to end users.
#[derive(Error, Debug)]
#[error("{provider} error: {source}")]
pub struct UpstreamFailure {
    provider: &'static str,
    #[source]
    source: Error,
}

impl UpstreamFailure {
    pub fn new(provider: &'static str, source: Error) -> Self {
        Self { provider, source }
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// The adapter-level cause.
    pub fn cause(&self) -> &Error {
        &self.source
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.source, Error::Cancelled)
    }
}
