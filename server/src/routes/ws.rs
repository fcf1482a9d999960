//! WebSocket handler: authenticated relay connection.
//!
//! DESIGN
//! ======
//! The token is checked before the upgrade; a rejected token gets a 401 and
//! nothing is registered. After upgrade the connection is registered and
//! enters a `select!` loop with two cases:
//! - Incoming client frame → decode + route through the relay
//! - Outbound frame queued by a room broadcast → forward to the socket
//!
//! LIFECYCLE
//! =========
//! 1. Verify `?token=` → 401 on failure
//! 2. Upgrade → register with an empty room set
//! 3. Frames → relay (join / leave / chat)
//! 4. Close, socket error, or failed send → deregister (always)

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::services::auth::UserId;
use crate::services::relay::{self, Routed};
use crate::state::AppState;

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;

// =============================================================================
// UPGRADE
// =============================================================================

#[derive(Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

pub async fn handle_ws(State(state): State<AppState>, Query(query): Query<WsQuery>, ws: WebSocketUpgrade) -> Response {
    let token = query.token.as_deref().unwrap_or_default();

    let user_id = match state.verifier.verify(token) {
        Ok(uid) => uid,
        Err(e) => {
            warn!(error = %e, "ws: rejected connection");
            return (StatusCode::UNAUTHORIZED, "invalid or missing token").into_response();
        }
    };

    ws.on_upgrade(move |socket| run_ws(socket, state, user_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, user_id: UserId) {
    // Per-connection queue for frames broadcast by room peers.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(state.client_channel_capacity);
    let (conn, connections) = {
        let mut registry = state.registry.lock().await;
        let conn = registry.register(user_id.clone(), client_tx);
        (conn, registry.connection_count())
    };

    info!(%conn, %user_id, connections, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => match relay::handle_text(&state, conn, text.as_str()).await {
                        Routed::Joined { room, new } => info!(%conn, %room, new, "ws: join room"),
                        Routed::Left { room, was_member } => info!(%conn, %room, was_member, "ws: leave room"),
                        Routed::Relayed { room, delivered, skipped } => {
                            debug!(%conn, %room, delivered, skipped, "ws: relayed chat");
                        }
                        Routed::Dropped => {}
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(text) = client_rx.recv() => {
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    let mut registry = state.registry.lock().await;
    let removed = registry.deregister(conn);
    let (connections, active_rooms) = (registry.connection_count(), registry.room_count());
    drop(registry);

    match removed {
        Some(c) => info!(%conn, user_id = %c.user_id, rooms = c.rooms.len(), connections, active_rooms, "ws: client disconnected"),
        None => warn!(%conn, "ws: disconnected connection was not registered"),
    }
}
