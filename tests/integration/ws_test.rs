//! WebSocket tests against a server bound to a local port.

mod helpers;

use futures::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use helpers::{TestApp, WsClient, ws_connect, ws_expect_silence, ws_next, ws_next_text, ws_send};

/// Connects a client and returns its socket and assigned id.
async fn join(addr: std::net::SocketAddr) -> (WsClient, String) {
    let mut ws = ws_connect(addr, "/ws").await;
    let join = ws_next(&mut ws).await;
    assert_eq!(join["type"], "JOIN");
    let id = join["clientId"].as_str().expect("clientId").to_string();
    (ws, id)
}

#[tokio::test]
async fn test_join_and_ping() {
    let app = TestApp::new();
    let addr = app.spawn().await;
    let (mut ws, _) = join(addr).await;

    ws_send(&mut ws, json!({"type": "PING"})).await;
    assert_eq!(ws_next(&mut ws).await, json!({"type": "PONG"}));
}

#[tokio::test]
async fn test_invalid_frame_keeps_connection_open() {
    let app = TestApp::new();
    let addr = app.spawn().await;
    let (mut ws, _) = join(addr).await;

    ws.send(Message::text("{not json")).await.unwrap();
    let error = ws_next(&mut ws).await;
    assert_eq!(error["type"], "ERROR");
    assert!(error["message"].is_string());

    ws_send(&mut ws, json!({"type": "PING"})).await;
    assert_eq!(ws_next(&mut ws).await["type"], "PONG");
}

#[tokio::test]
async fn test_text_chat_over_sockets() {
    let app = TestApp::new();
    let addr = app.spawn().await;
    let (mut a, a_id) = join(addr).await;
    let (mut b, b_id) = join(addr).await;

    ws_send(&mut a, json!({"type": "FIND_PARTNER", "mode": "text"})).await;
    ws_expect_silence(&mut a).await;
    ws_send(&mut b, json!({"type": "FIND_PARTNER", "mode": "text"})).await;

    assert_eq!(
        ws_next(&mut a).await,
        json!({"type": "PARTNER_FOUND", "partnerId": b_id})
    );
    assert_eq!(
        ws_next(&mut b).await,
        json!({"type": "PARTNER_FOUND", "partnerId": a_id})
    );

    let message = r#"{"type":"TEXT_MESSAGE","text":"hi","seq":12345678901234567890123}"#;
    a.send(Message::text(message)).await.unwrap();
    assert_eq!(ws_next_text(&mut b).await, message);
    ws_expect_silence(&mut a).await;

    b.close(None).await.unwrap();
    assert_eq!(ws_next(&mut a).await["type"], "PARTNER_DISCONNECTED");
}

#[tokio::test]
async fn test_admin_observes_video_signaling() {
    let app = TestApp::new();
    let addr = app.spawn().await;
    let (mut c, c_id) = join(addr).await;
    let (mut d, _) = join(addr).await;

    ws_send(&mut c, json!({"type": "FIND_PARTNER", "mode": "video"})).await;
    ws_send(&mut d, json!({"type": "FIND_PARTNER", "mode": "video"})).await;
    assert_eq!(ws_next(&mut c).await["type"], "PARTNER_FOUND");
    assert_eq!(ws_next(&mut d).await["type"], "PARTNER_FOUND");

    let session = app.login().await;
    let mut admin = ws_connect(addr, &format!("/ws/admin?sessionId={session}")).await;
    // A reply proves the observer socket is attached.
    ws_send(&mut admin, json!({"type": "PING"})).await;
    assert_eq!(ws_next(&mut admin).await["type"], "PONG");

    let chats = app
        .request("GET", &format!("/api/admin/videochats?sessionId={session}"), None)
        .await;
    let chat_id = chats.body["chats"][0]["id"].as_str().unwrap().to_string();
    let started = app
        .request(
            "POST",
            "/api/admin/monitor",
            Some(json!({"sessionId": session, "chatId": chat_id})),
        )
        .await;
    assert_eq!(started.status, http::StatusCode::OK);

    let offer = r#"{"type":"OFFER","offer":{"type":"offer","sdp":"v=0"},"seq":12345678901234567890123}"#;
    c.send(Message::text(offer)).await.unwrap();
    assert_eq!(ws_next_text(&mut d).await, offer);
    assert_eq!(
        ws_next_text(&mut admin).await,
        format!(r#"{{"type":"ADMIN_MONITOR","sourceClientId":"{c_id}","signalData":{offer}}}"#)
    );

    ws_send(&mut d, json!({"type": "LEAVE"})).await;
    assert_eq!(ws_next(&mut c).await["type"], "PARTNER_DISCONNECTED");
    assert_eq!(
        ws_next(&mut admin).await,
        json!({"type": "ADMIN_CHAT_ENDED", "chatId": chat_id})
    );
}

#[tokio::test]
async fn test_status_counts_open_sockets() {
    let app = TestApp::new();
    let addr = app.spawn().await;
    let (_a, _) = join(addr).await;
    let (_b, _) = join(addr).await;

    let status = app.request("GET", "/api/status", None).await;
    assert_eq!(status.body["connections"], 2);
}

#[tokio::test]
async fn test_binary_frame_with_invalid_utf8_is_rejected() {
    let app = TestApp::new();
    let addr = app.spawn().await;
    let (mut ws, _) = join(addr).await;

    ws.send(Message::binary(vec![0xff, 0xfe, 0xfd])).await.unwrap();
    let error = ws_next(&mut ws).await;
    assert_eq!(error["type"], "ERROR");
    assert_eq!(error["message"], "Message is not valid UTF-8");

    ws.send(Message::binary(br#"{"type":"PING"}"#.to_vec())).await.unwrap();
    assert_eq!(ws_next(&mut ws).await["type"], "PONG");
}
