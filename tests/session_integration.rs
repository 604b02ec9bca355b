use serde_json::{json, Value};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nexus::config::{ModelConfig, ProviderConfig};
use nexus::message::Role;
use nexus::providers::GeminiProvider;
use nexus::session::ChatSession;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn session_for(server: &MockServer) -> ChatSession {
    let config = ProviderConfig {
        api_base: server.uri(),
        timeout_seconds: 5,
    };
    let provider = GeminiProvider::new(&config, "test-key").unwrap();
    ChatSession::new(Box::new(provider), ModelConfig::default())
}

async fn recorded_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Each turn replays the full prior history plus the new input: the second
/// request carries three content blocks, and the new user turn appears
/// exactly once.
#[tokio::test]
async fn test_full_history_replay_across_turns() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "reply" }] } }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.submit_turn("first question", Vec::new()).await;
    session.submit_turn("second question", Vec::new()).await;

    let bodies = recorded_bodies(&server).await;
    assert_eq!(bodies.len(), 2);

    let first_contents = bodies[0]["contents"].as_array().unwrap();
    assert_eq!(first_contents.len(), 1);
    assert_eq!(first_contents[0]["parts"][0]["text"], json!("first question"));

    let second_contents = bodies[1]["contents"].as_array().unwrap();
    assert_eq!(second_contents.len(), 3);
    assert_eq!(
        second_contents[0]["parts"][0]["text"],
        json!("first question")
    );
    assert_eq!(second_contents[1]["role"], json!("model"));
    assert_eq!(second_contents[1]["parts"][0]["text"], json!("reply"));
    assert_eq!(
        second_contents[2]["parts"][0]["text"],
        json!("second question")
    );
}

/// A failed turn stays in the store and is replayed on the next turn; the
/// session keeps working afterwards.
#[tokio::test]
async fn test_error_turn_is_replayed_afterwards() {
    let server = MockServer::start().await;

    // First call fails, the retry succeeds.
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "recovered" }] } }]
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server);

    let failed = session.submit_turn("doomed question", Vec::new()).await;
    assert!(failed.is_error);
    assert_eq!(session.conversation().len(), 2);

    let recovered = session.submit_turn("try again", Vec::new()).await;
    assert!(!recovered.is_error);
    assert_eq!(recovered.text, "recovered");

    // The second request replays the failed turn's user message and the
    // synthesized error reply.
    let bodies = recorded_bodies(&server).await;
    let retry_contents = bodies[1]["contents"].as_array().unwrap();
    assert_eq!(retry_contents.len(), 3);
    assert_eq!(
        retry_contents[0]["parts"][0]["text"],
        json!("doomed question")
    );
    assert_eq!(retry_contents[1]["role"], json!("model"));
    assert!(retry_contents[1]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error: "));
}

/// The store ends up with alternating user/model turns in append order.
#[tokio::test]
async fn test_store_order_after_turns() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "reply" }] } }],
            "usageMetadata": {
                "promptTokenCount": 4,
                "candidatesTokenCount": 2,
                "totalTokenCount": 6
            }
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.submit_turn("one", Vec::new()).await;
    session.submit_turn("two", Vec::new()).await;

    let roles: Vec<Role> = session
        .conversation()
        .messages()
        .iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::User, Role::Model]);

    let totals = session.usage_totals();
    assert_eq!(totals.reported_turns, 2);
    assert_eq!(totals.total_tokens, 12);
}

/// Config changes between turns apply to the next request only.
#[tokio::test]
async fn test_config_changes_apply_to_next_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "reply" }] } }]
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.submit_turn("plain", Vec::new()).await;

    session.set_search(true);
    session.set_thinking(true);
    session.set_thinking_budget(256);
    session.submit_turn("grounded", Vec::new()).await;

    let bodies = recorded_bodies(&server).await;
    assert!(bodies[0].get("tools").is_none());
    assert!(bodies[0]["generationConfig"].get("thinkingConfig").is_none());

    assert_eq!(bodies[1]["tools"], json!([{ "googleSearch": {} }]));
    assert_eq!(
        bodies[1]["generationConfig"]["thinkingConfig"]["thinkingBudget"],
        json!(256)
    );
}
