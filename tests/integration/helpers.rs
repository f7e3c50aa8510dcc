//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use pairhub_api::AppState;
use pairhub_api::router::build_router;
use pairhub_auth::AdminAuthenticator;
use pairhub_core::config::AppConfig;

/// Operator password accepted by [`TestApp`].
pub const ADMIN_PASSWORD: &str = "let-me-watch";

/// Accepts exactly one password, without hashing.
pub struct FixedPassword(pub &'static str);

#[async_trait]
impl AdminAuthenticator for FixedPassword {
    async fn verify(&self, password: &str) -> bool {
        password == self.0
    }
}

/// Test application context
pub struct TestApp {
    /// Shared state; every router built from it talks to the same engine
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config, Arc::new(FixedPassword(ADMIN_PASSWORD))),
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Make a request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Logs in as operator and returns the admin session id.
    pub async fn login(&self) -> String {
        let response = self
            .request(
                "POST",
                "/api/admin/login",
                Some(serde_json::json!({ "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["sessionId"]
            .as_str()
            .expect("sessionId in login response")
            .to_string()
    }

    /// Serves the app on an ephemeral local port.
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        addr
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
}

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens a WebSocket to `path` on a spawned server.
pub async fn ws_connect(addr: SocketAddr, path: &str) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{addr}{path}"))
        .await
        .expect("WebSocket handshake");
    ws
}

pub async fn ws_send(ws: &mut WsClient, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("WebSocket send");
}

/// Next JSON text frame, skipping control frames.
pub async fn ws_next(ws: &mut WsClient) -> Value {
    let text = ws_next_text(ws).await;
    serde_json::from_str(&text).expect("frame is JSON")
}

/// Next text frame exactly as sent by the server.
pub async fn ws_next_text(ws: &mut WsClient) -> String {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("WebSocket error");
        match msg {
            Message::Text(text) => return text.as_str().to_owned(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Asserts no text frame arrives within a short window.
pub async fn ws_expect_silence(ws: &mut WsClient) {
    if let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_millis(200), ws.next()).await
    {
        panic!("expected no frame, got {text}");
    }
}
