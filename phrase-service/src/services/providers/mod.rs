//! Text-generation provider abstraction.
//!
//! The relay only needs one capability from a provider: turn a system prompt
//! plus the user's text into some opaque content. Keeping that behind a trait
//! lets the handlers run against the real Anthropic client or a mock.

pub mod anthropic;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Rate limited: {body}")]
    RateLimited { body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A remote text-generation backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Run one completion and return the provider's `content` untouched.
    async fn generate(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;
}
