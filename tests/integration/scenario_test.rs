//! End-to-end matchmaking scenarios driven through the engine API.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::mpsc;

use pairhub_core::config::{AdminConfig, RealtimeConfig};
use pairhub_core::types::ClientId;
use pairhub_realtime::{ChatMode, ConnectionHandle, RealtimeEngine};

use helpers::{ADMIN_PASSWORD, FixedPassword};

struct Client {
    id: ClientId,
    rx: mpsc::Receiver<String>,
}

impl Client {
    async fn connect(engine: &RealtimeEngine) -> Self {
        let (handle, mut rx) = ConnectionHandle::channel(32);
        let id = engine.connect(handle).await;
        let join = next(&mut rx);
        assert_eq!(join["type"], "JOIN");
        assert_eq!(join["clientId"], id.to_string());
        Self { id, rx }
    }

    async fn send(&self, engine: &RealtimeEngine, value: Value) {
        engine.handle_inbound(self.id, &value.to_string()).await;
    }

    fn next(&mut self) -> Value {
        next(&mut self.rx)
    }

    fn assert_silent(&mut self) {
        if let Ok(frame) = self.rx.try_recv() {
            panic!("expected no frame, got {frame}");
        }
    }
}

fn next(rx: &mut mpsc::Receiver<String>) -> Value {
    let frame = rx.try_recv().expect("a queued frame");
    serde_json::from_str(&frame).expect("frame is JSON")
}

fn engine_with(realtime: RealtimeConfig) -> RealtimeEngine {
    RealtimeEngine::new(
        realtime,
        &AdminConfig::default(),
        Arc::new(FixedPassword(ADMIN_PASSWORD)),
    )
}

fn engine() -> RealtimeEngine {
    engine_with(RealtimeConfig::default())
}

async fn assert_consistent(engine: &RealtimeEngine) {
    let violations = engine.invariant_violations().await;
    assert!(violations.is_empty(), "invariants broken: {violations:?}");
}

#[tokio::test]
async fn test_text_chat_lifecycle() {
    let engine = engine();
    let mut a = Client::connect(&engine).await;
    let mut b = Client::connect(&engine).await;

    // A waits alone.
    a.send(&engine, json!({"type": "FIND_PARTNER", "mode": "text"})).await;
    a.assert_silent();
    assert_eq!(engine.waiting(ChatMode::Text).await, vec![a.id]);
    assert_consistent(&engine).await;

    // B pairs with A.
    b.send(&engine, json!({"type": "FIND_PARTNER", "mode": "text"})).await;
    let found_a = a.next();
    let found_b = b.next();
    assert_eq!(found_a["type"], "PARTNER_FOUND");
    assert_eq!(found_a["partnerId"], b.id.to_string());
    assert_eq!(found_b["type"], "PARTNER_FOUND");
    assert_eq!(found_b["partnerId"], a.id.to_string());
    assert!(engine.waiting(ChatMode::Text).await.is_empty());
    assert_consistent(&engine).await;

    // Text is relayed verbatim and never echoed.
    let message = json!({"type": "TEXT_MESSAGE", "text": "hi"});
    a.send(&engine, message.clone()).await;
    assert_eq!(b.next(), message);
    a.assert_silent();

    // B drops.
    assert!(engine.disconnect(b.id).await);
    assert_eq!(a.next()["type"], "PARTNER_DISCONNECTED");
    let info = engine.session_info(&a.id).await.unwrap();
    assert_eq!(info.partner_id, None);
    assert!(!info.monitored);
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn test_monitored_video_chat() {
    let engine = engine();
    let mut c = Client::connect(&engine).await;
    let mut d = Client::connect(&engine).await;
    c.send(&engine, json!({"type": "FIND_PARTNER", "mode": "video"})).await;
    d.send(&engine, json!({"type": "FIND_PARTNER", "mode": "video"})).await;
    assert_eq!(c.next()["type"], "PARTNER_FOUND");
    assert_eq!(d.next()["type"], "PARTNER_FOUND");

    let admin = engine.login(ADMIN_PASSWORD).await.unwrap();
    let chats = engine.list_active_video_sessions(&admin).await.unwrap();
    assert_eq!(chats.len(), 1);
    let chat = chats[0].clone();
    assert!(chat.is_between(&c.id, &d.id));

    let (observer, mut observer_rx) = ConnectionHandle::channel(32);
    engine.attach_observer(admin, observer).await.unwrap();
    engine.start_monitoring(admin, chat.id).await.unwrap();
    assert!(engine.session_info(&c.id).await.unwrap().monitored);
    assert!(engine.session_info(&d.id).await.unwrap().monitored);
    assert_consistent(&engine).await;

    let offer = json!({"type": "OFFER", "offer": {"sdp": "v=0", "type": "offer"}});
    c.send(&engine, offer.clone()).await;
    assert_eq!(d.next(), offer);
    c.assert_silent();

    let mirrored = next(&mut observer_rx);
    assert_eq!(mirrored["type"], "ADMIN_MONITOR");
    assert_eq!(mirrored["sourceClientId"], c.id.to_string());
    assert_eq!(mirrored["signalData"], offer);

    d.send(&engine, json!({"type": "LEAVE"})).await;
    assert_eq!(c.next()["type"], "PARTNER_DISCONNECTED");
    let ended = next(&mut observer_rx);
    assert_eq!(ended["type"], "ADMIN_CHAT_ENDED");
    assert_eq!(ended["chatId"], chat.id.to_string());

    assert!(engine.list_active_video_sessions(&admin).await.unwrap().is_empty());
    assert!(!engine.session_info(&c.id).await.unwrap().monitored);
    assert!(!engine.session_info(&d.id).await.unwrap().monitored);
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn test_idle_client_is_swept_and_partner_notified() {
    let engine = engine_with(RealtimeConfig {
        idle_timeout_seconds: 1,
        ..RealtimeConfig::default()
    });
    let mut a = Client::connect(&engine).await;
    let b = Client::connect(&engine).await;
    a.send(&engine, json!({"type": "FIND_PARTNER", "mode": "text"})).await;
    b.send(&engine, json!({"type": "FIND_PARTNER", "mode": "text"})).await;
    assert_eq!(a.next()["type"], "PARTNER_FOUND");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    // A stays active; B does not.
    a.send(&engine, json!({"type": "PING"})).await;
    assert_eq!(a.next()["type"], "PONG");

    let report = engine.sweep_now().await;
    assert_eq!(report.idle, 1);
    assert_eq!(engine.connection_count().await, 1);
    assert!(engine.session_info(&b.id).await.is_none());
    assert_eq!(a.next()["type"], "PARTNER_DISCONNECTED");
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn test_closed_transport_is_swept() {
    let engine = engine();
    let mut a = Client::connect(&engine).await;
    let b = Client::connect(&engine).await;
    a.send(&engine, json!({"type": "FIND_PARTNER", "mode": "video"})).await;
    b.send(&engine, json!({"type": "FIND_PARTNER", "mode": "video"})).await;
    assert_eq!(a.next()["type"], "PARTNER_FOUND");

    drop(b.rx);
    let report = engine.sweep_now().await;
    assert_eq!(report.closed, 1);
    assert_eq!(a.next()["type"], "PARTNER_DISCONNECTED");
    assert_eq!(engine.connection_count().await, 1);
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn test_invalid_frames_leave_state_untouched() {
    let engine = engine();
    let mut a = Client::connect(&engine).await;

    engine.handle_inbound(a.id, "not json").await;
    assert_eq!(a.next()["type"], "ERROR");

    a.send(&engine, json!({"type": "FIND_PARTNER", "mode": "audio"})).await;
    assert_eq!(a.next()["type"], "ERROR");
    assert!(engine.waiting(ChatMode::Text).await.is_empty());
    assert!(engine.waiting(ChatMode::Video).await.is_empty());

    a.send(&engine, json!({"type": "SOMETHING_NEW"})).await;
    a.assert_silent();
    assert_eq!(engine.connection_count().await, 1);
    assert_consistent(&engine).await;
}

#[tokio::test]
async fn test_many_clients_keep_invariants() {
    let engine = engine();
    let mut clients = Vec::new();
    for _ in 0..7 {
        clients.push(Client::connect(&engine).await);
    }
    for (i, client) in clients.iter().enumerate() {
        let mode = if i % 2 == 0 { "text" } else { "video" };
        client.send(&engine, json!({"type": "FIND_PARTNER", "mode": mode})).await;
    }
    assert_consistent(&engine).await;

    // Four text seekers pair up, three video seekers leave one waiting.
    assert!(engine.waiting(ChatMode::Text).await.is_empty());
    assert_eq!(engine.waiting(ChatMode::Video).await.len(), 1);

    for client in clients.iter().take(3) {
        engine.disconnect(client.id).await;
    }
    assert_consistent(&engine).await;
    assert_eq!(engine.connection_count().await, 4);
}
