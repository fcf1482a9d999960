//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the connection registry, the per-room shape history and the
//! token verifier. The registry sits behind one mutex that guards both of
//! its indexes, so join/leave/deregister and whole chat broadcasts are
//! serialized per server. The history lock is only ever taken inside it or
//! on its own.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::ServerConfig;
use crate::services::auth::{SignedTokenVerifier, TokenVerifier};
use crate::services::history::RoomHistory;
use crate::services::registry::Registry;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Mutex<Registry>>,
    pub history: Arc<RwLock<RoomHistory>>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Depth of each connection's outbound queue.
    pub client_channel_capacity: usize,
}

impl AppState {
    #[must_use]
    pub fn new(verifier: Arc<dyn TokenVerifier>, room_history_limit: usize, client_channel_capacity: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
            history: Arc::new(RwLock::new(RoomHistory::new(room_history_limit))),
            verifier,
            client_channel_capacity,
        }
    }

    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            Arc::new(SignedTokenVerifier::new(config.auth_secret.clone())),
            config.room_history_limit,
            config.client_channel_capacity,
        )
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
