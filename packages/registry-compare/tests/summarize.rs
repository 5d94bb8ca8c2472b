use openai_client::{OpenAIClient, OpenAIConfig};
use registry_common::{RetryPolicy, Siren};
use registry_compare::{ChatSummarizer, PerplexityResearcher, Summarizer, WebResearcher};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(OpenAIConfig::new("sk-test").with_base_url(server.uri()))
        .unwrap()
        .with_retry_policy(RetryPolicy::none())
}

async fn answer(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_each_summary_sees_only_its_own_payload() {
    let server = MockServer::start().await;
    answer(
        &server,
        json!({"choices": [{"message": {"role": "assistant", "content": "Synthèse"}}]}),
    )
    .await;

    let summarizer = ChatSummarizer::with_client(client_for(&server), "gpt-4o");
    let legalmap = json!({"source": "LEGALMAP-ONLY-MARKER"});
    let pappers = json!({"source": "PAPPERS-ONLY-MARKER"});

    assert_eq!(summarizer.summarize(&legalmap).await.unwrap(), "Synthèse");
    assert_eq!(summarizer.summarize(&pappers).await.unwrap(), "Synthèse");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);

    for body in &bodies {
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
    }

    let first = bodies[0].to_string();
    assert!(first.contains("LEGALMAP-ONLY-MARKER"));
    assert!(!first.contains("PAPPERS-ONLY-MARKER"));

    let second = bodies[1].to_string();
    assert!(second.contains("PAPPERS-ONLY-MARKER"));
    assert!(!second.contains("LEGALMAP-ONLY-MARKER"));
}

#[tokio::test]
async fn test_summary_api_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let summarizer = ChatSummarizer::with_client(client_for(&server), "gpt-4o");
    let err = summarizer.summarize(&json!({"a": 1})).await.unwrap_err();

    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_research_lists_citations() {
    let server = MockServer::start().await;
    answer(
        &server,
        json!({
            "choices": [{"message": {"role": "assistant", "content": "Rapport"}}],
            "citations": ["https://example.com/a", "https://example.com/b"]
        }),
    )
    .await;

    let researcher =
        PerplexityResearcher::with_client(client_for(&server), "sonar-pro").with_citations(true);
    let siren = Siren::parse("552100554").unwrap();

    let report = researcher.research(&siren, Some("EXAMPLE SA")).await.unwrap();

    assert_eq!(
        report,
        "Rapport\n\nSources :\n- https://example.com/a\n- https://example.com/b"
    );

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "sonar-pro");
    assert_eq!(bodies[0]["return_citations"], true);
    let user = bodies[0]["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("552100554"));
    assert!(user.contains("EXAMPLE SA"));
}

#[tokio::test]
async fn test_research_without_citations_is_plain() {
    let server = MockServer::start().await;
    answer(
        &server,
        json!({"choices": [{"message": {"role": "assistant", "content": "Rapport"}}]}),
    )
    .await;

    let researcher = PerplexityResearcher::with_client(client_for(&server), "sonar-pro");
    let siren = Siren::parse("552100554").unwrap();

    assert_eq!(researcher.research(&siren, None).await.unwrap(), "Rapport");

    let bodies = request_bodies(&server).await;
    assert!(bodies[0].get("return_citations").is_none());
}
