//! Room history route: the persistence collaborator clients seed from.

use axum::Json;
use axum::extract::{Path, State};
use frames::{RoomId, ShapesResponse};

use crate::state::AppState;

/// `GET /api/rooms/{room_id}/shapes`: recent shapes for a room, oldest first.
pub async fn list_shapes(State(state): State<AppState>, Path(room_id): Path<String>) -> Json<ShapesResponse> {
    let room = RoomId::from(room_id);
    let shapes = state.history.read().await.recent(&room);
    Json(ShapesResponse { shapes })
}
