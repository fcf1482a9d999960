//! Room history: bounded in-memory log of relayed shapes per room.
//!
//! DESIGN
//! ======
//! Every well-formed shape the relay forwards is appended here so a client
//! joining late can seed its store from `GET /api/rooms/{id}/shapes`. Each
//! room keeps at most `limit` shapes; the oldest is evicted first. Nothing is
//! written to disk, so a restart starts every room empty.

use std::collections::{HashMap, VecDeque};

use frames::{RoomId, Shape};

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

#[derive(Debug)]
pub struct RoomHistory {
    limit: usize,
    rooms: HashMap<RoomId, VecDeque<Shape>>,
}

impl RoomHistory {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit, rooms: HashMap::new() }
    }

    /// Record a relayed shape for `room`.
    pub fn push(&mut self, room: RoomId, shape: Shape) {
        if self.limit == 0 {
            return;
        }
        let log = self.rooms.entry(room).or_default();
        if log.len() == self.limit {
            log.pop_front();
        }
        log.push_back(shape);
    }

    /// Shapes recorded for `room`, oldest first.
    #[must_use]
    pub fn recent(&self, room: &RoomId) -> Vec<Shape> {
        self.rooms
            .get(room)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
