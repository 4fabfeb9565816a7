use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest};

/// OpenRouter client for the OpenAI-compatible chat completions API
#[derive(Debug)]
pub struct OpenRouter {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    base_url: String,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
pub struct CompletionRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    /// Candidate completions (we only ever use the first)
    pub choices: Vec<CompletionChoice>,

    /// Token usage, when the provider reports it
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// Individual completion choice
#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    /// The completion message
    pub message: ChatMessage,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Number of completion tokens
    #[serde(default)]
    pub completion_tokens: u64,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenRouter {
    /// Create a new OpenRouter client
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Complete a chat completions request
    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenRouter API error ({}): {}", status, error_text);

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthenticationError(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Test the connection to the API with a minimal request
    pub async fn test_connection(&self, model: &str) -> Result<(), ProviderError> {
        let request = CompletionRequest::new(model).add_message("user", "Hello");
        self.complete(request).await?;
        Ok(())
    }

    /// Extract text from a completions response
    pub fn extract_text(response: &CompletionResponse) -> String {
        response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for OpenRouter {
    async fn chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let completion = CompletionRequest::new(request.model)
            .add_message("system", request.system)
            .add_message("user", request.user)
            .temperature(request.temperature);

        let response = self.complete(completion).await?;
        Ok(Self::extract_text(&response))
    }
}
