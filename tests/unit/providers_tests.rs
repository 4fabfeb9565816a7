/*!
 * Tests for provider implementations
 */

use std::sync::Arc;

use doctran::errors::ProviderError;
use doctran::providers::mock::{MockChatProvider, ScriptedReply};
use doctran::providers::openrouter::OpenRouter;
use doctran::providers::{ChatProvider, ChatRequest};

/// Test the request builder defaults
#[test]
fn test_chatRequest_withNew_shouldUseDefaultTemperature() {
    let request = ChatRequest::new("model-a", "system", "user");
    assert_eq!(request.model, "model-a");
    assert!((request.temperature - 0.3).abs() < f32::EPSILON);
}

/// Test the temperature builder
#[test]
fn test_chatRequest_withTemperature_shouldOverrideDefault() {
    let request = ChatRequest::new("model-a", "system", "user").temperature(0.9);
    assert!((request.temperature - 0.9).abs() < f32::EPSILON);
}

/// Test the echo mock returns the user message
#[test]
fn test_mockProvider_withEcho_shouldReturnUserMessage() {
    let provider = MockChatProvider::echo();
    let response = tokio_test::block_on(provider.chat(ChatRequest::new("m", "sys", "the payload")))
        .unwrap();
    assert_eq!(response, "the payload");
}

/// Test scripted replies play back in order, then error
#[tokio::test]
async fn test_mockProvider_withScript_shouldPlayRepliesInOrder() {
    let provider = MockChatProvider::script(vec![
        ScriptedReply::text("first"),
        ScriptedReply::text("second"),
    ]);

    let request = ChatRequest::new("m", "s", "u");
    assert_eq!(provider.chat(request.clone()).await.unwrap(), "first");
    assert_eq!(provider.chat(request.clone()).await.unwrap(), "second");

    // Exhausted script fails rather than silently looping
    assert!(provider.chat(request).await.is_err());
    assert_eq!(provider.call_count(), 3);
}

/// Test scripted failures surface as request errors
#[tokio::test]
async fn test_mockProvider_withScriptedFailure_shouldReturnError() {
    let provider = MockChatProvider::script(vec![ScriptedReply::Fail("boom".to_string())]);

    let error = provider
        .chat(ChatRequest::new("m", "s", "u"))
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::RequestFailed(_)));
}

/// Test requests are recorded for later inspection
#[tokio::test]
async fn test_mockProvider_withRequests_shouldRecordEachOne() {
    let provider = Arc::new(MockChatProvider::always("ok"));

    provider
        .chat(ChatRequest::new("model-x", "sys", "hello"))
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "model-x");
    assert_eq!(requests[0].user, "hello");
}

/// Test the mock works behind the provider trait object
#[test]
fn test_mockProvider_asTraitObject_shouldAnswerRequests() {
    let provider: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::always("fixed"));
    let response =
        tokio_test::block_on(provider.chat(ChatRequest::new("m", "s", "u"))).unwrap();
    assert_eq!(response, "fixed");
}

/// Test the connection check surfaces transport failures
#[tokio::test]
async fn test_openRouter_testConnection_withUnreachableHost_shouldFail() {
    // Nothing listens on the discard port, so the request fails fast
    let client = OpenRouter::new("test-key", "http://127.0.0.1:9/api/v1");

    let error = client.test_connection("test-model").await.unwrap_err();
    assert!(matches!(error, ProviderError::RequestFailed(_)));
}
