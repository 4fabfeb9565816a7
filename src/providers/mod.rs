/*!
 * Provider implementations for LLM chat services.
 *
 * This module contains the chat client abstraction used by the translation
 * pipeline and the review loop, plus the concrete implementations:
 * - OpenRouter: OpenAI-compatible chat completions API
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A role-tagged chat request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The model to use
    pub model: String,

    /// System instruction guiding the model
    pub system: String,

    /// User message content
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: 0.3,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Common trait for all LLM chat providers
///
/// The pipeline and the review loop issue the same kind of request: one
/// system instruction plus one user message, answered with a single text
/// completion. Implementations must be usable behind a trait object so tests
/// can substitute a scripted provider.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Complete a chat request and return the response text
    async fn chat(&self, request: ChatRequest) -> Result<String, ProviderError>;
}

pub mod mock;
pub mod openrouter;
