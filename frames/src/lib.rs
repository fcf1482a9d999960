//! Shared shape and envelope model for the realtime drawing wire protocol.
//!
//! This crate owns the wire representation used by both `server` and
//! `canvas`. Frames are JSON text with fixed field names:
//!
//! ```json
//! { "type": "join_room", "roomId": "1" }
//! { "type": "leave_room", "roomId": "1" }
//! { "type": "chat", "roomId": "1", "message": "{\"shape\":{\"type\":\"rect\",...}}" }
//! ```
//!
//! The `message` of a `chat` frame is itself the JSON text of a
//! [`ShapeMessage`]. [`decode`] parses it once and returns a [`Frame`] that
//! carries the parsed shape next to the verbatim text, so a frame which
//! decodes successfully always has a well-formed shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned by [`decode`] and [`decode_shape_message`].
///
/// Callers drop the offending frame; a decode failure never terminates a
/// connection.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Not JSON, unknown `type`, missing or empty `roomId`, or a field of the
    /// wrong kind.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A `chat` frame whose `message` is the empty string.
    #[error("chat message is empty")]
    EmptyMessage,
    /// A `chat` frame whose `message` is not a `{"shape": ...}` wrapper.
    #[error("chat message is not a shape: {0}")]
    NotAShape(serde_json::Error),
}

// =============================================================================
// ROOM ID
// =============================================================================

/// Opaque room identifier.
///
/// Accepted on the wire as a non-empty string or an integer; always
/// re-emitted as a string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRoomId", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<RoomId> for String {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoomId {
    Text(String),
    Number(i64),
}

impl TryFrom<RawRoomId> for RoomId {
    type Error = &'static str;

    fn try_from(raw: RawRoomId) -> Result<Self, Self::Error> {
        match raw {
            RawRoomId::Text(s) if s.is_empty() => Err("roomId must not be empty"),
            RawRoomId::Text(s) => Ok(Self(s)),
            RawRoomId::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

// =============================================================================
// SHAPES
// =============================================================================

/// A point in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An immutable drawn primitive in world coordinates.
///
/// Width, height and radius may be negative; they are stored exactly as
/// committed and never normalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Shape {
    /// Axis-aligned rectangle anchored at `(x, y)`.
    Rect { x: f64, y: f64, width: f64, height: f64 },
    /// Circle around `(center_x, center_y)`.
    Circle { center_x: f64, center_y: f64, radius: f64 },
    /// Freehand polyline through `points`, in drawing order.
    Pencil { points: Vec<Point> },
}

impl Shape {
    /// Wire tag of this shape, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Pencil { .. } => "pencil",
        }
    }
}

/// The `{"shape": ...}` wrapper carried in a chat frame's `message`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeMessage {
    pub shape: Shape,
}

/// Body of the room history endpoint: shapes oldest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapesResponse {
    pub shapes: Vec<Shape>,
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// A single message on the realtime wire protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Envelope {
    /// Add the connection to a room.
    JoinRoom { room_id: RoomId },
    /// Remove the connection from a room.
    LeaveRoom { room_id: RoomId },
    /// Relay `message` (an encoded [`ShapeMessage`]) to every member of the room.
    Chat { room_id: RoomId, message: String },
}

impl Envelope {
    /// Build a chat frame carrying `shape` for `room_id`.
    #[must_use]
    pub fn chat(room_id: RoomId, shape: &Shape) -> Self {
        Self::Chat { room_id, message: encode_shape_message(shape) }
    }

    /// The room this frame addresses.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id } | Self::LeaveRoom { room_id } | Self::Chat { room_id, .. } => room_id,
        }
    }
}

/// A decoded inbound frame. Chat frames carry both the verbatim `message`
/// text and the shape parsed from it.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    JoinRoom { room_id: RoomId },
    LeaveRoom { room_id: RoomId },
    Chat { room_id: RoomId, message: String, shape: Shape },
}

impl Frame {
    /// Build a chat frame carrying `shape` for `room_id`.
    #[must_use]
    pub fn chat(room_id: RoomId, shape: Shape) -> Self {
        Self::Chat { room_id, message: encode_shape_message(&shape), shape }
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id } | Self::LeaveRoom { room_id } | Self::Chat { room_id, .. } => room_id,
        }
    }
}

impl From<Frame> for Envelope {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::JoinRoom { room_id } => Self::JoinRoom { room_id },
            Frame::LeaveRoom { room_id } => Self::LeaveRoom { room_id },
            Frame::Chat { room_id, message, .. } => Self::Chat { room_id, message },
        }
    }
}

/// Encode an envelope as JSON text.
#[must_use]
pub fn encode(envelope: &Envelope) -> String {
    // Serializing these types into a String cannot fail: all map keys are
    // strings and non-finite floats serialize as null.
    serde_json::to_string(envelope).unwrap_or_default()
}

/// Decode JSON text into a frame, parsing a chat's shape exactly once.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] for invalid JSON, an unknown `type` or
/// a missing/empty `roomId`, [`DecodeError::EmptyMessage`] for a chat frame
/// with an empty `message`, and [`DecodeError::NotAShape`] when the chat
/// `message` does not decode as a [`ShapeMessage`].
pub fn decode(text: &str) -> Result<Frame, DecodeError> {
    let frame = match serde_json::from_str(text)? {
        Envelope::JoinRoom { room_id } => Frame::JoinRoom { room_id },
        Envelope::LeaveRoom { room_id } => Frame::LeaveRoom { room_id },
        Envelope::Chat { message, .. } if message.is_empty() => return Err(DecodeError::EmptyMessage),
        Envelope::Chat { room_id, message } => {
            let shape = decode_shape_message(&message)?;
            Frame::Chat { room_id, message, shape }
        }
    };
    Ok(frame)
}

/// Encode a shape as the `{"shape": ...}` wrapper text.
#[must_use]
pub fn encode_shape_message(shape: &Shape) -> String {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        shape: &'a Shape,
    }
    serde_json::to_string(&Borrowed { shape }).unwrap_or_default()
}

/// Decode the `{"shape": ...}` wrapper text carried in a chat frame.
///
/// # Errors
///
/// Returns [`DecodeError::NotAShape`] if the text is not a valid wrapper.
pub fn decode_shape_message(text: &str) -> Result<Shape, DecodeError> {
    serde_json::from_str::<ShapeMessage>(text)
        .map(|m| m.shape)
        .map_err(DecodeError::NotAShape)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
