//! Document summarization over an LLM chat-completion provider.
//!
//! The service accepts document text over HTTP, builds a style-conditioned
//! prompt, delegates to a [`ChatProvider`] and returns the summary with
//! metadata. Failures are classified into [`SummaryError`] and written as
//! RFC 7807 problem envelopes.

pub mod api;
pub mod error;
pub mod logger;
pub mod problem;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod service;
pub mod types;

// Re-export core types for easy usage
pub use api::{router, AppState};
pub use error::{Error, UpstreamFailure};
pub use problem::{ProblemDetails, ProblemTranslator, SummaryError};
pub use prompt::build_prompt;
pub use provider::{ChatCompletion, ChatProvider};
pub use providers::*;
pub use service::{DocumentSummaryService, SummaryObserver, TracingObserver};
pub use types::*;
