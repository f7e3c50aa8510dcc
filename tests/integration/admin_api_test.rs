//! Integration tests for the admin REST surface and the status endpoint.

mod helpers;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use pairhub_realtime::{ChatMode, ConnectionHandle};

use helpers::{ADMIN_PASSWORD, TestApp};

/// Pairs two in-memory video clients and returns the receivers.
async fn video_pair(
    app: &TestApp,
) -> (tokio::sync::mpsc::Receiver<String>, tokio::sync::mpsc::Receiver<String>) {
    let engine = &app.state.realtime;
    let (c, rx_c) = ConnectionHandle::channel(32);
    let (d, rx_d) = ConnectionHandle::channel(32);
    let c = engine.connect(c).await;
    let d = engine.connect(d).await;
    let find = json!({"type": "FIND_PARTNER", "mode": ChatMode::Video}).to_string();
    engine.handle_inbound(c, &find).await;
    engine.handle_inbound(d, &find).await;
    (rx_c, rx_d)
}

#[tokio::test]
async fn test_status_reports_connections() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/status", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "OK", "connections": 0}));

    let _clients = video_pair(&app).await;
    let response = app.request("GET", "/api/status", None).await;
    assert_eq!(response.body["connections"], 2);
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = TestApp::new();

    let ok = app
        .request("POST", "/api/admin/login", Some(json!({"password": ADMIN_PASSWORD})))
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["success"], true);
    assert!(ok.body["sessionId"].is_string());

    let bad = app
        .request("POST", "/api/admin/login", Some(json!({"password": "nope"})))
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["success"], false);
    assert!(bad.body.get("sessionId").is_none());

    let missing = app.request("POST", "/api/admin/login", Some(json!({}))).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_against_configured_argon2_hash() {
    let mut config = pairhub_core::config::AppConfig::default();
    config.admin.password_hash = pairhub_auth::PasswordHasher::new()
        .hash_password("from-config")
        .unwrap();
    let app = TestApp {
        state: pairhub_api::AppState::from_config(config),
    };

    let ok = app
        .request("POST", "/api/admin/login", Some(json!({"password": "from-config"})))
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let bad = app
        .request("POST", "/api/admin/login", Some(json!({"password": ADMIN_PASSWORD})))
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_videochats_lists_active_pairs() {
    let app = TestApp::new();
    let session = app.login().await;
    let _clients = video_pair(&app).await;

    let response = app
        .request("GET", &format!("/api/admin/videochats?sessionId={session}"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let chats = response.body["chats"].as_array().unwrap();
    assert_eq!(chats.len(), 1);
    assert!(chats[0]["id"].is_string());
    assert!(chats[0]["client1"].is_string());
    assert!(chats[0]["client2"].is_string());
}

#[tokio::test]
async fn test_videochats_requires_valid_session() {
    let app = TestApp::new();

    let missing = app.request("GET", "/api/admin/videochats", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let bogus = app
        .request(
            "GET",
            "/api/admin/videochats?sessionId=00000000-0000-4000-8000-000000000000",
            None,
        )
        .await;
    assert_eq!(bogus.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bogus.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_monitor_status_codes() {
    let app = TestApp::new();
    let session = app.login().await;
    let _clients = video_pair(&app).await;
    let chat_id = app
        .request("GET", &format!("/api/admin/videochats?sessionId={session}"), None)
        .await
        .body["chats"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Session is checked before the chat id.
    let unauthorized = app
        .request("POST", "/api/admin/monitor", Some(json!({"sessionId": "bad"})))
        .await;
    assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);

    let missing_chat = app
        .request("POST", "/api/admin/monitor", Some(json!({"sessionId": session})))
        .await;
    assert_eq!(missing_chat.status, StatusCode::BAD_REQUEST);

    let blank_chat = app
        .request(
            "POST",
            "/api/admin/monitor",
            Some(json!({"sessionId": session, "chatId": "  "})),
        )
        .await;
    assert_eq!(blank_chat.status, StatusCode::BAD_REQUEST);

    let unknown_chat = app
        .request(
            "POST",
            "/api/admin/monitor",
            Some(json!({"sessionId": session, "chatId": "00000000-0000-4000-8000-000000000000"})),
        )
        .await;
    assert_eq!(unknown_chat.status, StatusCode::NOT_FOUND);

    let ok = app
        .request(
            "POST",
            "/api/admin/monitor",
            Some(json!({"sessionId": session, "chatId": chat_id})),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["success"], true);
    assert!(ok.body["message"].is_string());
}

#[tokio::test]
async fn test_stop_monitor_is_idempotent() {
    let app = TestApp::new();
    let session = app.login().await;
    let _clients = video_pair(&app).await;
    let chat_id = app
        .request("GET", &format!("/api/admin/videochats?sessionId={session}"), None)
        .await
        .body["chats"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let body = json!({"sessionId": session, "chatId": chat_id});

    for _ in 0..2 {
        let response = app.request("POST", "/api/admin/stop-monitor", Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let unknown = app
        .request(
            "POST",
            "/api/admin/stop-monitor",
            Some(json!({"sessionId": session, "chatId": "00000000-0000-4000-8000-000000000000"})),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = TestApp::new();
    let session = app.login().await;

    let response = app
        .request("POST", "/api/admin/logout", Some(json!({"sessionId": session})))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let after = app
        .request("GET", &format!("/api/admin/videochats?sessionId={session}"), None)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let again = app
        .request("POST", "/api/admin/logout", Some(json!({"sessionId": session})))
        .await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_socket_rejects_bad_session_before_upgrade() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws/admin?sessionId=nope", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/ws/admin", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unreadable_body_gets_json_error() {
    let app = TestApp::new();

    let wrong_type = app
        .request("POST", "/api/admin/login", Some(json!({"password": 5})))
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["success"], false);
    assert_eq!(wrong_type.body["error"], "VALIDATION_ERROR");
    assert!(wrong_type.body["message"].is_string());

    let wrong_type = app
        .request(
            "POST",
            "/api/admin/monitor",
            Some(json!({"sessionId": ["not", "a", "string"]})),
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["success"], false);
}

#[tokio::test]
async fn test_missing_content_type_gets_json_error() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/logout")
        .body(Body::from(r#"{"sessionId":"x"}"#))
        .unwrap();

    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
