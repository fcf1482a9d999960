//! Persistence collaborator: fetches a room's existing shapes on load.
//!
//! The engine never blocks on this. [`fetch_seed`] degrades a failed fetch to
//! an empty list so a cold or unreachable backend still yields a usable board.

#[cfg(test)]
#[path = "net_test.rs"]
mod net_test;

use std::future::Future;

use frames::{RoomId, Shape, ShapesResponse};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything but RFC 3986 unreserved characters is escaped in the room segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Why the seed list could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The request never produced a response, or its body was not a shape list.
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
    /// The backend answered with a non-success status.
    #[error("persistence returned status {0}")]
    Status(u16),
}

impl From<gloo_net::Error> for PersistenceError {
    fn from(err: gloo_net::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Source of a room's previously committed shapes, oldest first.
pub trait ShapeSource {
    fn fetch_shapes(&self, room_id: &RoomId) -> impl Future<Output = Result<Vec<Shape>, PersistenceError>>;
}

/// `GET {api_base}/api/rooms/{room_id}/shapes` against the relay server.
#[derive(Debug, Clone)]
pub struct HttpShapeSource {
    api_base: String,
}

impl HttpShapeSource {
    /// `api_base` is the server origin, e.g. `http://localhost:8080`. Empty
    /// means same-origin.
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self { api_base: api_base.into() }
    }
}

impl ShapeSource for HttpShapeSource {
    async fn fetch_shapes(&self, room_id: &RoomId) -> Result<Vec<Shape>, PersistenceError> {
        let resp = gloo_net::http::Request::get(&shapes_url(&self.api_base, room_id)).send().await?;
        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(PersistenceError::Status(status));
        }
        let body: ShapesResponse = resp.json().await?;
        Ok(body.shapes)
    }
}

fn shapes_url(api_base: &str, room_id: &RoomId) -> String {
    let segment = utf8_percent_encode(room_id.as_str(), PATH_SEGMENT);
    format!("{}/api/rooms/{segment}/shapes", api_base.trim_end_matches('/'))
}

/// Fetch the seed list, falling back to an empty board on any failure.
pub async fn fetch_seed<S: ShapeSource>(source: &S, room_id: &RoomId) -> Vec<Shape> {
    match source.fetch_shapes(room_id).await {
        Ok(shapes) => {
            log::debug!("seeded room {room_id} with {} shapes", shapes.len());
            shapes
        }
        Err(err) => {
            log::warn!("seed for room {room_id} failed, starting empty: {err}");
            Vec::new()
        }
    }
}
