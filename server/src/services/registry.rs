//! Connection registry: who is connected and which rooms they are in.
//!
//! DESIGN
//! ======
//! Two indexes kept in lockstep: `connection -> (user, sender, rooms)` and
//! `room -> connections`. Every mutation updates both, so a room's member
//! set can be read in O(members) without scanning all connections.
//!
//! Connection ids are allocated from a counter and stored in ordered maps,
//! so iteration order is registration order. The registry itself is not
//! synchronized; `AppState` wraps it in a single mutex, and the relay holds
//! that mutex for the whole of a chat fan-out.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use frames::RoomId;
use tokio::sync::mpsc;

use crate::services::auth::UserId;

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// Registry-local handle for one live websocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Outbound half of a connection: encoded frames queued for the socket task.
pub type Outbox = mpsc::Sender<String>;

/// One participant's live session.
#[derive(Debug)]
pub struct Connection {
    pub user_id: UserId,
    pub outbox: Outbox,
    pub rooms: BTreeSet<RoomId>,
}

#[derive(Debug, Default)]
pub struct Registry {
    next_id: u64,
    connections: BTreeMap<ConnectionId, Connection>,
    rooms: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an authenticated connection with no room memberships.
    pub fn register(&mut self, user_id: UserId, outbox: Outbox) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.connections.insert(id, Connection { user_id, outbox, rooms: BTreeSet::new() });
        id
    }

    /// Add `room` to the connection's memberships.
    ///
    /// Returns `true` if the membership is new. Joining twice is a no-op, and
    /// joining from an unknown connection does nothing.
    pub fn join(&mut self, id: ConnectionId, room: RoomId) -> bool {
        let Some(conn) = self.connections.get_mut(&id) else {
            return false;
        };
        if !conn.rooms.insert(room.clone()) {
            return false;
        }
        self.rooms.entry(room).or_default().insert(id);
        true
    }

    /// Remove `room` from the connection's memberships.
    ///
    /// Returns `true` if the connection was a member.
    pub fn leave(&mut self, id: ConnectionId, room: &RoomId) -> bool {
        let Some(conn) = self.connections.get_mut(&id) else {
            return false;
        };
        if !conn.rooms.remove(room) {
            return false;
        }
        self.unindex(id, room);
        true
    }

    /// Remove the connection and all of its memberships.
    pub fn deregister(&mut self, id: ConnectionId) -> Option<Connection> {
        let conn = self.connections.remove(&id)?;
        for room in &conn.rooms {
            self.unindex(id, room);
        }
        Some(conn)
    }

    /// Snapshot of `(id, outbox)` for every member of `room`, in registration order.
    ///
    /// The relay delivers to this snapshot before releasing the registry lock,
    /// so every member of a room sees its frames in the same order.
    #[must_use]
    pub fn recipients(&self, room: &RoomId) -> Vec<(ConnectionId, Outbox)> {
        let Some(ids) = self.rooms.get(room) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.connections.get(id).map(|c| (*id, c.outbox.clone())))
            .collect()
    }

    /// Number of live connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of rooms with at least one member.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn unindex(&mut self, id: ConnectionId, room: &RoomId) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }
}

#[cfg(test)]
impl Registry {
    /// Rooms the connection currently belongs to.
    pub fn rooms_of(&self, id: ConnectionId) -> Option<&BTreeSet<RoomId>> {
        self.connections.get(&id).map(|c| &c.rooms)
    }

    /// Current members of `room`, in registration order.
    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
