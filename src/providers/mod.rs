//! Provider implementations for chat-completion services.

pub mod azure_openai;

// Re-export commonly used provider types
pub use azure_openai::AzureOpenAiProvider;
