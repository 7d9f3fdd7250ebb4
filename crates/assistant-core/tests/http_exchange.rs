use std::sync::{Arc, Mutex};

use assistant_core::view::{MessageLog, ScrollTracker, SendToggle, TextBuffer};
use assistant_core::{
    ChatClient, ChatController, ChatMessage, ChatTransport, DiagnosticSink, ExchangeError,
    InputField, UiHandles, CONNECTION_FAILURE_REPLY, GENERIC_FAILURE_REPLY,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn handle_chat(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.seen.lock().unwrap().push((content_type, payload));
    (
        state.status,
        [("content-type", "application/json")],
        state.body,
    )
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn spawn_chat_server(status: StatusCode, body: &'static str) -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState {
        status,
        body,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

/// A base URL nothing is listening on
async fn closed_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[derive(Default)]
struct RecordingSink {
    records: Mutex<Vec<String>>,
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, error: &ExchangeError) {
        self.records.lock().unwrap().push(error.to_string());
    }
}

type HeadlessController = ChatController<TextBuffer, SendToggle, MessageLog, ScrollTracker>;

fn headless(base_url: &str, sink: Arc<RecordingSink>) -> HeadlessController {
    let handles = UiHandles {
        input: TextBuffer::new(),
        send: SendToggle::default(),
        list: MessageLog::default(),
        scroll: ScrollTracker::default(),
    };
    ChatController::new(handles, Arc::new(ChatClient::new(base_url))).with_sink(sink)
}

#[tokio::test]
async fn posts_trimmed_message_as_json() {
    let (url, state) = spawn_chat_server(StatusCode::OK, r#"{"response": "hello"}"#).await;
    let mut chat = headless(&url, Arc::new(RecordingSink::default()));

    chat.handles_mut().input.set("  hi  ");
    chat.submit().await;

    let seen = state.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("application/json"));
    assert_eq!(seen[0].1, json!({ "message": "hi" }));
}

#[tokio::test]
async fn success_reply_is_rendered_verbatim() {
    let (url, _state) = spawn_chat_server(StatusCode::OK, r#"{"response": "hello"}"#).await;
    let sink = Arc::new(RecordingSink::default());
    let mut chat = headless(&url, sink.clone());

    chat.handles_mut().input.set("hi");
    chat.submit().await;

    assert_eq!(
        chat.handles().list.messages,
        vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")]
    );
    assert!(!chat.handles().list.typing);
    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn server_error_shows_generic_message() {
    let (url, _state) =
        spawn_chat_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"response": "ignored"}"#).await;
    let sink = Arc::new(RecordingSink::default());
    let mut chat = headless(&url, sink.clone());

    chat.handles_mut().input.set("hi");
    chat.submit().await;

    assert_eq!(
        chat.transcript().last(),
        Some(&ChatMessage::assistant(GENERIC_FAILURE_REPLY))
    );
    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn error_status_body_is_ignored_even_when_not_json() {
    let (url, _state) = spawn_chat_server(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await;
    let client = ChatClient::new(&url);

    let err = client.send_message("hi").await.unwrap_err();
    assert!(matches!(err, ExchangeError::Status(502)));
}

#[tokio::test]
async fn malformed_success_body_is_a_connection_failure() {
    let (url, _state) = spawn_chat_server(StatusCode::OK, r#"{"answer": "wrong field"}"#).await;
    let sink = Arc::new(RecordingSink::default());
    let mut chat = headless(&url, sink.clone());

    chat.handles_mut().input.set("hi");
    chat.submit().await;

    assert_eq!(
        chat.transcript().last(),
        Some(&ChatMessage::assistant(CONNECTION_FAILURE_REPLY))
    );
    assert_eq!(sink.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_server_reports_to_sink() {
    let url = closed_server_url().await;
    let sink = Arc::new(RecordingSink::default());
    let mut chat = headless(&url, sink.clone());

    chat.handles_mut().input.set("anyone there?");
    chat.submit().await;

    assert_eq!(
        chat.transcript().last(),
        Some(&ChatMessage::assistant(CONNECTION_FAILURE_REPLY))
    );
    assert_eq!(sink.records.lock().unwrap().len(), 1);
    assert!(!chat.handles().list.typing);
    assert!(chat.handles().input.value().is_empty());
}

#[tokio::test]
async fn health_reports_server_status() {
    let (url, _state) = spawn_chat_server(StatusCode::OK, "{}").await;
    let status = ChatClient::new(&url).health().await.expect("health");
    assert!(status.is_healthy());

    let closed = closed_server_url().await;
    assert!(ChatClient::new(&closed).health().await.is_err());
}
