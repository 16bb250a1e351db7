//! Integration test: `/chat` router against a stand-in Gemini API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chatbot_server::gemini::{BLOCKED_REPLY, GeminiClient, NO_CANDIDATES_REPLY};
use chatbot_server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

/// What the fake upstream saw for one call.
#[derive(Debug, Clone)]
struct UpstreamCall {
    path: String,
    key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    reply: Value,
    calls: Arc<Mutex<Vec<UpstreamCall>>>,
}

async fn generate(
    State(fake): State<FakeGemini>,
    Path(call): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.calls.lock().unwrap().push(UpstreamCall {
        path: call,
        key: params.get("key").cloned(),
        body,
    });
    (fake.status, Json(fake.reply.clone()))
}

/// Start a fake Gemini API and return the chat router wired to it.
async fn chat_router(status: StatusCode, reply: Value) -> (Router, Arc<Mutex<Vec<UpstreamCall>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeGemini {
        status,
        reply,
        calls: calls.clone(),
    };
    let upstream = Router::new()
        .route("/v1beta/models/{call}", post(generate))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let state = AppState {
        gemini: GeminiClient::new(&format!("http://{}", addr), "test-model", "test-key"),
    };
    (router(state), calls)
}

fn text_reply(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("parse JSON"))
}

#[tokio::test]
async fn chat_returns_trimmed_reply() {
    let (app, calls) = chat_router(StatusCode::OK, text_reply("  Hi there\n")).await;

    let (status, body) = post_chat(app, r#"{"message": "Hello"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Hi there" }));

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.path, "test-model:generateContent");
    assert_eq!(call.key.as_deref(), Some("test-key"));
    assert_eq!(
        call.body["contents"][0]["parts"][0]["text"],
        "You are a helpful AI chatbot. Respond to the following user message: Hello"
    );
    assert_eq!(call.body["generationConfig"]["maxOutputTokens"], 150);
}

#[tokio::test]
async fn blank_message_is_rejected_without_upstream_call() {
    let (app, calls) = chat_router(StatusCode::OK, text_reply("unused")).await;

    let (status, body) = post_chat(app, r#"{"message": "   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "response": "Please enter a message." }));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_message_field_counts_as_blank() {
    let (app, _calls) = chat_router(StatusCode::OK, text_reply("unused")).await;
    let (status, _) = post_chat(app, "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn no_candidates_gives_apology() {
    let (app, _calls) = chat_router(StatusCode::OK, json!({ "candidates": [] })).await;
    let (status, body) = post_chat(app, r#"{"message": "Hello"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], NO_CANDIDATES_REPLY);
}

#[tokio::test]
async fn blocked_candidate_gives_safety_reply() {
    let (app, _calls) = chat_router(
        StatusCode::OK,
        json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
    )
    .await;
    let (status, body) = post_chat(app, r#"{"message": "Hello"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], BLOCKED_REPLY);
}

#[tokio::test]
async fn upstream_failure_is_reported_in_response() {
    let (app, _calls) = chat_router(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "quota" } }),
    )
    .await;

    let (status, body) = post_chat(app, r#"{"message": "Hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let text = body["response"].as_str().expect("response is string");
    assert!(
        text.starts_with("Error: Request to API failed:"),
        "unexpected response: {text}"
    );
    assert!(!text.contains("test-key"), "API key leaked: {text}");
}

#[tokio::test]
async fn malformed_body_is_internal_error() {
    let (app, _calls) = chat_router(StatusCode::OK, text_reply("unused")).await;

    let (status, body) = post_chat(app, "not json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let text = body["response"].as_str().expect("response is string");
    assert!(text.starts_with("Error: "), "unexpected response: {text}");
}

#[tokio::test]
async fn client_session_round_trip() {
    let (app, _calls) = chat_router(StatusCode::OK, text_reply("Hi there")).await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = chatbot_core::ChatClient::new(&format!("http://{}/chat", addr));
    let mut session = chatbot_core::ChatSession::new();
    session.input = "Hello".to_string();
    let entry = session.submit_and_wait(&client).await.expect("submitted");

    assert_eq!(session.transcript().get(entry).unwrap().content, "Hi there");
    assert_eq!(session.input, "");
}
