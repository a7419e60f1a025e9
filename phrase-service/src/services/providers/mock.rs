//! Mock provider for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// One recorded `generate` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub user_input: String,
}

enum MockOutcome {
    Content(serde_json::Value),
    Failure(String),
}

/// Mock text provider that records every call.
pub struct MockTextProvider {
    model: String,
    outcome: MockOutcome,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    /// Provider that answers every call with `content`.
    pub fn with_content(content: serde_json::Value) -> Self {
        Self::new(MockOutcome::Content(content))
    }

    /// Provider whose calls all fail with a network error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockOutcome::Failure(message.into()))
    }

    fn new(outcome: MockOutcome) -> Self {
        Self {
            model: "mock-model".to_string(),
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system_prompt: system_prompt.to_string(),
                user_input: user_input.to_string(),
            });
        }

        match &self.outcome {
            MockOutcome::Content(content) => Ok(content.clone()),
            MockOutcome::Failure(message) => Err(ProviderError::NetworkError(message.clone())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
