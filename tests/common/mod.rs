//! Common test utilities and helpers
#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::subscriber::DefaultGuard;

/// One request as seen by the fake completion endpoint
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the completion API, serving `POST /v1/responses`
pub struct FakeCompletionServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeCompletionServer {
    /// Start a server that answers every request with `status` and `body`
    pub async fn start(status: StatusCode, body: &str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            status,
            body: body.to_string(),
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route("/v1/responses", post(respond))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub async fn answering(text: &str) -> Self {
        let body = serde_json::json!({ "outputs": [{ "text": text }] }).to_string();
        Self::start(StatusCode::OK, &body).await
    }

    pub fn root_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn respond(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let header_text = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body,
    });

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

/// Root URL of a port nothing listens on
pub async fn refused_root_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

/// Completion endpoint that accepts requests and never answers them
pub struct HangingCompletionServer {
    addr: SocketAddr,
    received: Arc<Notify>,
    abandoned: Arc<Notify>,
}

#[derive(Clone)]
struct HangingState {
    received: Arc<Notify>,
    abandoned: Arc<Notify>,
}

// Fires when the handler future is dropped, i.e. the client went away
struct NotifyOnDrop(Arc<Notify>);

impl Drop for NotifyOnDrop {
    fn drop(&mut self) {
        self.0.notify_one();
    }
}

impl HangingCompletionServer {
    pub async fn start() -> Self {
        let received = Arc::new(Notify::new());
        let abandoned = Arc::new(Notify::new());
        let state = HangingState {
            received: Arc::clone(&received),
            abandoned: Arc::clone(&abandoned),
        };
        let app = Router::new()
            .route("/v1/responses", post(hang))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            received,
            abandoned,
        }
    }

    pub fn root_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Resolves once a request has reached the handler
    pub async fn request_received(&self) {
        self.received.notified().await;
    }

    /// Resolves once the client closed the connection of a pending request
    pub async fn request_abandoned(&self) {
        self.abandoned.notified().await;
    }
}

async fn hang(State(state): State<HangingState>, Json(_body): Json<Value>) -> StatusCode {
    let _signal = NotifyOnDrop(Arc::clone(&state.abandoned));
    state.received.notify_one();
    std::future::pending::<()>().await;
    StatusCode::OK
}

/// Log lines written by the thread-local subscriber from [`capture_logs`]
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture debug-level logs on the current thread until the guard drops
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
