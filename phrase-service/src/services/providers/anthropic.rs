//! Anthropic provider implementation.
//!
//! Calls the Messages API once per request and hands back the response's
//! `content` array without looking inside it.

use super::{ProviderError, TextProvider};
use crate::config::AnthropicSettings;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Messages API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic text provider.
pub struct AnthropicTextProvider {
    settings: AnthropicSettings,
    client: Client,
}

impl AnthropicTextProvider {
    pub fn new(settings: AnthropicSettings) -> Result<Self, ProviderError> {
        if settings.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Anthropic API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { settings, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.settings.base_url)
    }
}

#[async_trait]
impl TextProvider for AnthropicTextProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        let request = MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_input,
            }],
        };

        tracing::debug!(
            model = %self.settings.model,
            max_tokens = self.settings.max_tokens,
            input_len = user_input.len(),
            "Sending request to Anthropic Messages API"
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.settings.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            tracing::error!(status = %status, body = %body, "Anthropic API returned an error");

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited { body });
            }

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            })?;

        tracing::debug!(
            model = %self.settings.model,
            stop_reason = ?api_response.stop_reason,
            "Anthropic response received"
        );

        Ok(api_response.content)
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

// ============================================================================
// Messages API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    /// Missing `content` is relayed as `null`.
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    stop_reason: Option<String>,
}
