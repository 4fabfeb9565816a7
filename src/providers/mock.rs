/*!
 * Mock provider implementation for testing.
 *
 * This module provides a scripted chat provider so pipeline and review tests
 * never make external API calls:
 * - `MockChatProvider::echo()` - returns the user message unchanged
 * - `MockChatProvider::always(text)` - returns the same completion every time
 * - `MockChatProvider::script(replies)` - plays back replies in order
 * - `MockChatProvider::failing(message)` - always fails with an error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Successful completion with the given text
    Text(String),
    /// Failed request with the given error message
    Fail(String),
}

impl ScriptedReply {
    /// Convenience constructor for a text reply
    pub fn text(content: impl Into<String>) -> Self {
        ScriptedReply::Text(content.into())
    }
}

/// Behavior mode for the mock provider
#[derive(Debug)]
enum MockBehavior {
    /// Return the user message unchanged
    Echo,
    /// Return the same completion every time
    Always(String),
    /// Play back scripted replies in order, erroring once exhausted
    Script(Mutex<VecDeque<ScriptedReply>>),
    /// Always fail with the given message
    Failing(String),
}

/// Mock chat provider for testing translation and review behavior
#[derive(Debug)]
pub struct MockChatProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of chat calls made
    call_count: AtomicUsize,
    /// Every request received, in order
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatProvider {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that echoes the user message back
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that always returns the same completion
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Always(text.into()))
    }

    /// Create a mock that plays back the given replies in order
    pub fn script(replies: Vec<ScriptedReply>) -> Self {
        Self::new(MockBehavior::Script(Mutex::new(replies.into())))
    }

    /// Create a mock that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing(message.into()))
    }

    /// Number of chat calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every request received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match &self.behavior {
            MockBehavior::Echo => Ok(request.user),
            MockBehavior::Always(text) => Ok(text.clone()),
            MockBehavior::Script(replies) => match replies.lock().pop_front() {
                Some(ScriptedReply::Text(text)) => Ok(text),
                Some(ScriptedReply::Fail(message)) => {
                    Err(ProviderError::RequestFailed(message))
                }
                None => Err(ProviderError::RequestFailed(
                    "mock script exhausted".to_string(),
                )),
            },
            MockBehavior::Failing(message) => {
                Err(ProviderError::RequestFailed(message.clone()))
            }
        }
    }
}
