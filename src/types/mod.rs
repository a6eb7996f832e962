//! Core types used throughout the service.

pub mod config;
pub mod message;
pub mod summary;

// Re-export commonly used types
pub use config::*;
pub use message::*;
pub use summary::*;
