// tests/api_test.rs — Integration test: API routes with a mock provider

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use kotoba::api::{build_router, ApiState};
use kotoba::infra::errors::KotobaError;
use kotoba::provider::{GenerateRequest, ModelProvider};

/// A mock provider that returns canned output without making any network
/// calls, recording every request it receives.
struct MockProvider {
    output: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockProvider {
    fn returning(output: &str) -> Arc<Self> {
        Arc::new(Self {
            output: Some(output.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            output: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> GenerateRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Provider"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, KotobaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match self.output {
            Some(ref output) => Ok(output.clone()),
            None => Err(KotobaError::gateway("connection refused")),
        }
    }
}

fn test_state(provider: Arc<MockProvider>) -> ApiState {
    ApiState {
        provider,
        model: "mock-model".into(),
    }
}

async fn post_json(
    state: ApiState,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = build_router(state);
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(test_state(MockProvider::returning("unused")));
    let req = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_translate_returns_gateway_output_verbatim() {
    let provider = MockProvider::returning("こんにちは");
    let (status, body) = post_json(
        test_state(provider.clone()),
        "/api/v1/translate",
        serde_json::json!({
            "text": "Hello",
            "sourceLanguage": "English",
            "targetLanguage": "Japanese",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"translatedText": "こんにちは"}));

    // The prompt embeds all three inputs.
    let request = provider.last_request();
    let prompt = &request.contents[0].text;
    assert!(prompt.contains("English text to Japanese"));
    assert!(prompt.contains("Hello"));
}

#[tokio::test]
async fn test_translate_missing_field_is_400_without_gateway_call() {
    let provider = MockProvider::returning("unused");
    let (status, body) = post_json(
        test_state(provider.clone()),
        "/api/v1/translate",
        serde_json::json!({"text": "Hello", "sourceLanguage": "English"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Target language is required");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_translate_empty_field_is_400() {
    let provider = MockProvider::returning("unused");
    let (status, _) = post_json(
        test_state(provider.clone()),
        "/api/v1/translate",
        serde_json::json!({"text": "", "sourceLanguage": "English", "targetLanguage": "Japanese"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_chat_missing_message_is_400_without_gateway_call() {
    let provider = MockProvider::returning("unused");
    let (status, body) = post_json(
        test_state(provider.clone()),
        "/api/v1/chat",
        serde_json::json!({"nativeLanguage": "English", "learningLanguage": "Japanese"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_chat_replays_history_and_returns_response() {
    let provider = MockProvider::returning("はい、そうです。");
    let (status, body) = post_json(
        test_state(provider.clone()),
        "/api/v1/chat",
        serde_json::json!({
            "message": "Is that right?",
            "history": [
                {"role": "user", "parts": "hello"},
                {"role": "model", "parts": "こんにちは"},
            ],
            "nativeLanguage": "English",
            "learningLanguage": "Japanese",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"response": "はい、そうです。"}));

    // History turns precede the instruction-wrapped message.
    let request = provider.last_request();
    assert_eq!(request.contents.len(), 3);
    assert_eq!(request.contents[1].text, "こんにちは");
    assert!(request.contents[2].text.contains("practice Japanese"));
    assert!(request.contents[2].text.contains("Is that right?"));
}

#[tokio::test]
async fn test_chat_requires_only_message() {
    // Language fields are optional on this endpoint; absent values fall
    // back to the default pair.
    let provider = MockProvider::returning("こんにちは！");
    let (status, body) = post_json(
        test_state(provider.clone()),
        "/api/v1/chat",
        serde_json::json!({"message": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"response": "こんにちは！"}));

    let request = provider.last_request();
    assert!(request.contents[0].text.contains("practice Japanese"));
    assert!(request.contents[0].text.contains("native language is English"));
}

#[tokio::test]
async fn test_chat_history_defaults_to_empty() {
    let provider = MockProvider::returning("ok");
    let (status, _) = post_json(
        test_state(provider.clone()),
        "/api/v1/chat",
        serde_json::json!({
            "message": "hi",
            "nativeLanguage": "English",
            "learningLanguage": "Japanese",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.last_request().contents.len(), 1);
}

#[tokio::test]
async fn test_annotate_parses_structured_output() {
    let provider = MockProvider::returning(
        r#"{"annotations": [{"word": "cats", "explanation": "feline pets"}]}"#,
    );
    let (status, body) = post_json(
        test_state(provider.clone()),
        "/api/v1/annotate",
        serde_json::json!({
            "text": "I like cats",
            "language": "English",
            "explanationLanguage": "Japanese",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annotations"][0]["word"], "cats");
    assert_eq!(body["annotations"][0]["explanation"], "feline pets");

    // Structured output must be requested from the gateway.
    assert!(provider.last_request().response_schema.is_some());
}

#[tokio::test]
async fn test_annotate_malformed_output_is_500_generic() {
    let provider = MockProvider::returning("not json at all");
    let (status, body) = post_json(
        test_state(provider),
        "/api/v1/annotate",
        serde_json::json!({
            "text": "I like cats",
            "language": "English",
            "explanationLanguage": "Japanese",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Generic message only; the parse error stays in the logs.
    assert_eq!(body["error"], "Failed to communicate with the language service");
}

#[tokio::test]
async fn test_gateway_failure_is_500_generic() {
    let provider = MockProvider::failing();
    let (status, body) = post_json(
        test_state(provider),
        "/api/v1/translate",
        serde_json::json!({
            "text": "Hello",
            "sourceLanguage": "English",
            "targetLanguage": "Japanese",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(!body["error"].as_str().unwrap().contains("connection refused"));
}
