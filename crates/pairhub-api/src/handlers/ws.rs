//! WebSocket upgrade handlers for clients and admin observers.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use pairhub_core::error::AppError;
use pairhub_core::types::AdminSessionId;
use pairhub_realtime::ConnectionHandle;

use crate::dto::request::{SessionQuery, parse_admin_session};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws: client WebSocket upgrade
pub async fn client_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_client_socket(state, socket))
}

/// GET /ws/admin?sessionId=: observer WebSocket upgrade
///
/// The session is checked before the upgrade so a bad token gets a 401.
pub async fn admin_ws(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let admin_id = match parse_admin_session(query.session_id.as_deref()) {
        Ok(id) => id,
        Err(e) => return ApiError(e).into_response(),
    };

    if !state.realtime.is_admin(&admin_id).await {
        return ApiError(AppError::unauthorized("Invalid or expired admin session")).into_response();
    }

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_admin_socket(state, admin_id, socket)),
        Err(rejection) => rejection.into_response(),
    }
}

/// Drains queued frames into the socket. Sends a close frame once the
/// handle is dropped by the engine.
fn spawn_writer(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    })
}

/// Handles an established client connection.
async fn handle_client_socket(state: AppState, socket: WebSocket) {
    let (ws_tx, mut ws_rx) = socket.split();

    let (handle, outbound_rx) = ConnectionHandle::channel(state.realtime.outbound_buffer_size());
    let client_id = state.realtime.connect(handle).await;
    let writer = spawn_writer(ws_tx, outbound_rx);

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.realtime.handle_inbound(client_id, text.as_str()).await;
            }
            Ok(Message::Binary(bytes)) => {
                state.realtime.handle_inbound_bytes(client_id, &bytes).await;
            }
            Ok(Message::Close(_)) => break,
            // Ping/pong is answered by axum.
            Ok(_) => {}
            Err(e) => {
                warn!(client_id = %client_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    state.realtime.disconnect(client_id).await;
    writer.abort();

    info!(client_id = %client_id, "WebSocket connection closed");
}

/// Handles an established observer connection.
async fn handle_admin_socket(state: AppState, admin_id: AdminSessionId, socket: WebSocket) {
    let (ws_tx, mut ws_rx) = socket.split();

    let (handle, outbound_rx) = ConnectionHandle::channel(state.realtime.outbound_buffer_size());
    let connection_id = match state.realtime.attach_observer(admin_id, handle).await {
        Ok(id) => id,
        Err(e) => {
            warn!(admin_session = %admin_id, error = %e, "Observer attach refused");
            // The handle was dropped, so the writer just sends a close frame.
            let _ = spawn_writer(ws_tx, outbound_rx).await;
            return;
        }
    };
    let writer = spawn_writer(ws_tx, outbound_rx);

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.realtime.handle_admin_inbound(&admin_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(admin_session = %admin_id, error = %e, "Observer WebSocket error");
                break;
            }
        }
    }

    state.realtime.detach_observer(&admin_id, connection_id).await;
    writer.abort();

    info!(admin_session = %admin_id, "Observer connection closed");
}
