use docsum::providers::azure_openai::client::SYSTEM_PROMPT;
use docsum::{AzureOpenAiConfig, AzureOpenAiProvider, ChatProvider, Error};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEPLOYMENT: &str = "test-deployment";
const COMPLETIONS_PATH: &str = "/openai/deployments/test-deployment/chat/completions";

fn provider_for(server: &MockServer) -> AzureOpenAiProvider {
    let config = AzureOpenAiConfig::new(&server.uri(), "test-api-key", DEPLOYMENT)
        .expect("valid test config");
    AzureOpenAiProvider::new(config).expect("Failed to create Azure OpenAI provider")
}

fn completion_body(content: &str, model: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": model,
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ],
        "usage": { "prompt_tokens": 20, "completion_tokens": 9, "total_tokens": 29 }
    })
}

#[tokio::test]
async fn test_completion_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(query_param("api-version", "2024-10-21"))
        .and(header("api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": "Say hello" }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Hello! How can I assist you today?", "gpt-4o-mini")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let completion = provider
        .complete("Say hello", &CancellationToken::new())
        .await
        .expect("completion should succeed");

    assert_eq!(completion.summary_text, "Hello! How can I assist you today?");
    assert_eq!(completion.model, "gpt-4o-mini");
}

#[tokio::test]
async fn test_missing_model_falls_back_to_deployment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Summary" } }]
        })))
        .mount(&server)
        .await;

    let completion = provider_for(&server)
        .complete("prompt", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(completion.model, DEPLOYMENT);
}

#[tokio::test]
async fn test_rate_limit_is_wrapped_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": "429", "message": "Rate limited" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let failure = provider_for(&server)
        .complete("prompt", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(failure.cause(), Error::RateLimit));
    assert!(failure.to_string().contains("Azure OpenAI error"));
}

#[tokio::test]
async fn test_auth_failure_is_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": "401", "message": "Access denied due to invalid subscription key." }
        })))
        .mount(&server)
        .await;

    let failure = provider_for(&server)
        .complete("prompt", &CancellationToken::new())
        .await
        .unwrap_err();

    match failure.cause() {
        Error::Auth(message) => assert!(message.contains("invalid subscription key")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .expect(1)
        .mount(&server)
        .await;

    let failure = provider_for(&server)
        .complete("prompt", &CancellationToken::new())
        .await
        .unwrap_err();

    match failure.cause() {
        Error::Provider { status, message, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "internal failure");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_responses_are_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "model": "gpt-4o-mini", "choices": [] })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);

    let first = provider.complete("prompt", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(first.cause(), Error::Serialization(_)));

    let second = provider.complete("prompt", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(second.cause(), Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("late", "gpt-4o-mini"))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), provider.complete("prompt", &cancel))
        .await
        .expect("cancellation should stop the call well before the provider responds");

    let failure = result.unwrap_err();
    assert!(failure.is_cancelled());
}

#[tokio::test]
async fn test_transport_timeout_is_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("late", "gpt-4o-mini"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = AzureOpenAiConfig::new(&server.uri(), "test-api-key", DEPLOYMENT)
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let provider = AzureOpenAiProvider::new(config).unwrap();

    let failure = provider
        .complete("prompt", &CancellationToken::new())
        .await
        .unwrap_err();

    match failure.cause() {
        Error::Http(err) => assert!(err.is_timeout()),
        other => panic!("expected transport timeout, got {other:?}"),
    }
}
