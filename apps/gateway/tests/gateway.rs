//! End-to-end gateway tests over real HTTP with scripted providers.

use llm::{FinishReason, Message, StreamChunk};
use model::{ModelRegistry, ScriptedPool};
use otter_gateway::{
    ApiKeySessions, AppState, ServeHandle,
    config::{ApiKeyEntry, AuthConfig},
    serve,
};
use relay::{ChatRequest, Relay, StreamEvent, Toolbox};
use std::sync::Arc;
use store::{ChatStore, MemStore};

async fn start(pool: &ScriptedPool, store: &MemStore) -> (ServeHandle, String) {
    let registry = Arc::new(ModelRegistry::standard());
    let relay = Relay::new(
        Arc::clone(&registry),
        pool.clone(),
        store.clone(),
        Toolbox::new(reqwest::Client::new()),
    );
    let sessions = Arc::new(ApiKeySessions::from_config(&AuthConfig {
        api_keys: vec![
            ApiKeyEntry {
                key: "alice-key".into(),
                user: "alice".into(),
            },
            ApiKeyEntry {
                key: "bob-key".into(),
                user: "bob".into(),
            },
        ],
    }));

    let state = AppState {
        relay,
        registry,
        store: store.clone(),
        sessions,
    };
    let handle = serve(state, "127.0.0.1:0").await.unwrap();
    let base = format!("http://127.0.0.1:{}", handle.port);
    (handle, base)
}

fn chat_request(id: &str, model: &str, messages: Vec<Message>) -> ChatRequest {
    ChatRequest {
        id: id.into(),
        messages,
        selected_chat_model: model.into(),
    }
}

fn parse_events(body: &str) -> Vec<StreamEvent> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("valid event line"))
        .collect()
}

#[tokio::test]
async fn post_chat_streams_and_persists() {
    let pool = ScriptedPool::new();
    pool.push_turn(vec![
        StreamChunk::text("Hi "),
        StreamChunk::text("there!"),
        StreamChunk::finish(FinishReason::Stop),
    ]);
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/chat"))
        .bearer_auth("alice-key")
        .json(&chat_request(
            "c1",
            "chat-model-small",
            vec![Message::user("hello")],
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap(),
        "application/x-ndjson"
    );

    let body = response.text().await.unwrap();
    let events = parse_events(&body);
    let text: String = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::TextDelta { delta } => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "Hi there!");
    assert_eq!(events.last(), Some(&StreamEvent::Finish));

    // Both the user and the assistant message were persisted.
    let messages = store.messages_by_chat("c1").await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].content, "Hi there!");

    let chat = store.chat_by_id("c1").await.unwrap().unwrap();
    assert_eq!(chat.title, "hello");
    assert_eq!(chat.user_id, "alice");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn post_chat_without_token_is_401() {
    let pool = ScriptedPool::new();
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&chat_request(
            "c1",
            "chat-model-small",
            vec![Message::user("hello")],
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    assert!(store.chat_by_id("c1").await.unwrap().is_none());
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn post_chat_without_trailing_user_message_is_400() {
    let pool = ScriptedPool::new();
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .bearer_auth("alice-key")
        .json(&chat_request(
            "c1",
            "chat-model-small",
            vec![Message::user("hi"), Message::assistant("hello")],
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(pool.calls().is_empty());
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn post_chat_with_unknown_model_is_400() {
    let pool = ScriptedPool::new();
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .bearer_auth("alice-key")
        .json(&chat_request(
            "c1",
            "chat-model-unknown",
            vec![Message::user("hi")],
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn provider_failure_mid_stream_still_returns_200_with_error_event() {
    let pool = ScriptedPool::new();
    pool.push_failing_turn(vec![StreamChunk::text("partial ")], "boom");
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .bearer_auth("alice-key")
        .json(&chat_request(
            "c1",
            "chat-model-small",
            vec![Message::user("hello")],
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    let events = parse_events(&body);
    assert!(events.iter().any(|e| matches!(e, StreamEvent::Error { .. })));
    assert!(!events.contains(&StreamEvent::Finish));
    assert!(!body.contains("boom"));

    // The user message survived the failure.
    assert_eq!(store.messages_by_chat("c1").await.unwrap().len(), 1);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn models_endpoint_lists_the_catalog() {
    let pool = ScriptedPool::new();
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/models"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let models: Vec<serde_json::Value> = response.json().await.unwrap();
    let ids: Vec<&str> = models.iter().map(|m| m["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&"chat-model-small"));
    assert!(ids.contains(&"chat-model-reasoning"));
    assert!(!ids.contains(&"title-model"));

    let small = models.iter().find(|m| m["id"] == "chat-model-small").unwrap();
    assert_eq!(small["name"], "GPT 4o mini");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn history_and_delete_are_ownership_scoped() {
    let pool = ScriptedPool::new();
    pool.push_turn(vec![
        StreamChunk::text("sure"),
        StreamChunk::finish(FinishReason::Stop),
    ]);
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;
    let client = reqwest::Client::new();

    // Alice creates a chat.
    let response = client
        .post(format!("{base}/chat"))
        .bearer_auth("alice-key")
        .json(&chat_request(
            "c1",
            "chat-model-small",
            vec![Message::user("remember this")],
        ))
        .send()
        .await
        .unwrap();
    let _ = response.text().await.unwrap();

    // Alice sees it in history; Bob does not.
    let alice_history: Vec<serde_json::Value> = client
        .get(format!("{base}/history"))
        .bearer_auth("alice-key")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(alice_history.len(), 1);
    assert_eq!(alice_history[0]["id"], "c1");

    let bob_history: Vec<serde_json::Value> = client
        .get(format!("{base}/history"))
        .bearer_auth("bob-key")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(bob_history.is_empty());

    // Bob may not delete Alice's chat.
    let response = client
        .delete(format!("{base}/chat/c1"))
        .bearer_auth("bob-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    assert!(store.chat_by_id("c1").await.unwrap().is_some());

    // Alice may.
    let response = client
        .delete(format!("{base}/chat/c1"))
        .bearer_auth("alice-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(store.chat_by_id("c1").await.unwrap().is_none());

    // Deleting again is a 404.
    let response = client
        .delete(format!("{base}/chat/c1"))
        .bearer_auth("alice-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn unauthenticated_history_is_401() {
    let pool = ScriptedPool::new();
    let store = MemStore::new();
    let (handle, base) = start(&pool, &store).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/history"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    handle.shutdown().await.unwrap();
}
