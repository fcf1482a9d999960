//! Relay service: applies inbound frames and fans chat frames out to rooms.
//!
//! DESIGN
//! ======
//! `route` is the single dispatch point for decoded frames and matches the
//! closed frame set exhaustively. Join/leave mutate the registry. Chat takes
//! the registry lock, snapshots the room's recipients, records the shape in
//! history and enqueues the frame on every recipient's outbox before the lock
//! is released. Two chats for one room therefore reach every member, and the
//! history, in one order.
//!
//! Lock order is registry then history. Enqueueing uses `try_send`, so the
//! lock is never held across a slow peer.
//!
//! ERROR HANDLING
//! ==============
//! Malformed frames are dropped without telling the sender. Delivery is
//! best-effort: a peer whose outbox is closed or full is skipped and the
//! broadcast continues. Nothing is retried.

use frames::{Envelope, Frame, RoomId};
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::services::registry::{ConnectionId, Outbox};
use crate::state::AppState;

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;

/// What happened to one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// Peer's socket task is gone; it will be deregistered by its own loop.
    Closed,
    /// Peer is not draining its queue fast enough.
    Full,
}

/// Result of routing one frame, logged by the socket loop and asserted in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Joined { room: RoomId, new: bool },
    Left { room: RoomId, was_member: bool },
    Relayed { room: RoomId, delivered: usize, skipped: usize },
    Dropped,
}

/// Decode an inbound text frame and route it. Malformed frames yield `Dropped`.
pub async fn handle_text(state: &AppState, conn: ConnectionId, text: &str) -> Routed {
    match frames::decode(text) {
        Ok(frame) => route(state, conn, frame).await,
        Err(e) => {
            debug!(%conn, error = %e, "relay: dropped malformed frame");
            Routed::Dropped
        }
    }
}

/// Apply one frame on behalf of `conn`.
pub async fn route(state: &AppState, conn: ConnectionId, frame: Frame) -> Routed {
    match frame {
        Frame::JoinRoom { room_id } => {
            let new = state.registry.lock().await.join(conn, room_id.clone());
            Routed::Joined { room: room_id, new }
        }
        Frame::LeaveRoom { room_id } => {
            let was_member = state.registry.lock().await.leave(conn, &room_id);
            Routed::Left { room: room_id, was_member }
        }
        Frame::Chat { room_id, message, shape } => {
            debug!(%conn, room = %room_id, kind = shape.kind(), "relay: chat");
            let outbound = frames::encode(&Envelope::Chat { room_id: room_id.clone(), message });

            let registry = state.registry.lock().await;
            let recipients = registry.recipients(&room_id);
            state.history.write().await.push(room_id.clone(), shape);
            let (delivered, skipped) = broadcast(&recipients, &outbound);
            drop(registry);

            Routed::Relayed { room: room_id, delivered, skipped }
        }
    }
}

/// Deliver `text` to every recipient. Returns `(delivered, skipped)`.
pub fn broadcast(recipients: &[(ConnectionId, Outbox)], text: &str) -> (usize, usize) {
    let mut delivered = 0;
    let mut skipped = 0;
    for (id, outbox) in recipients {
        match deliver(outbox, text) {
            SendOutcome::Delivered => delivered += 1,
            outcome => {
                debug!(conn = %id, ?outcome, "relay: skipped peer");
                skipped += 1;
            }
        }
    }
    (delivered, skipped)
}

fn deliver(outbox: &Outbox, text: &str) -> SendOutcome {
    match outbox.try_send(text.to_owned()) {
        Ok(()) => SendOutcome::Delivered,
        Err(TrySendError::Closed(_)) => SendOutcome::Closed,
        Err(TrySendError::Full(_)) => SendOutcome::Full,
    }
}
