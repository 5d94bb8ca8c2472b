use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIConfig, OpenAIError};
use registry_common::RetryPolicy;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(OpenAIConfig::new("sk-test").with_base_url(server.uri()))
        .unwrap()
        .with_retry_policy(RetryPolicy::none())
}

fn completion(content: Value) -> Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

#[tokio::test]
async fn test_chat_completion_sends_bearer_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("Bonjour"))))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .chat_completion(
            ChatRequest::new("gpt-4o")
                .message(Message::system("sys"))
                .message(Message::user("Salut"))
                .temperature(0.2)
                .top_p(0.9),
        )
        .await
        .unwrap();

    assert_eq!(response.content, "Bonjour");
    assert_eq!(response.usage.unwrap().total_tokens, 15);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["messages"][1]["content"], "Salut");
    assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn test_null_content_is_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(Value::Null)))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .chat_completion(ChatRequest::new("gpt-4o").message(Message::user("x")))
        .await
        .unwrap();
    assert_eq!(response.content, "");
}

#[tokio::test]
async fn test_citations_and_extra_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Rapport"}}],
            "citations": ["https://example.com/a"]
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .chat_completion(ChatRequest::new("sonar-pro").extra("return_citations", json!(true)))
        .await
        .unwrap();
    assert_eq!(response.citations, vec!["https://example.com/a"]);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["return_citations"], true);
}

#[tokio::test]
async fn test_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .chat_completion(ChatRequest::new("gpt-4o"))
        .await
        .unwrap_err();
    match err {
        OpenAIError::Api(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}
