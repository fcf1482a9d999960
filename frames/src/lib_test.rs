#![allow(clippy::float_cmp)]

use super::*;

fn sample_rect() -> Shape {
    Shape::Rect { x: 10.0, y: 10.0, width: 40.0, height: 30.0 }
}

// =============================================================================
// Envelope decoding
// =============================================================================

#[test]
fn decode_join_room() {
    let env = decode(r#"{"type":"join_room","roomId":"1"}"#).expect("join should decode");
    assert_eq!(env, Frame::JoinRoom { room_id: RoomId::from("1") });
}

#[test]
fn decode_leave_room() {
    let env = decode(r#"{"type":"leave_room","roomId":"lobby"}"#).expect("leave should decode");
    assert_eq!(env, Frame::LeaveRoom { room_id: RoomId::from("lobby") });
}

#[test]
fn decode_accepts_numeric_room_id() {
    let env = decode(r#"{"type":"join_room","roomId":42}"#).expect("numeric room should decode");
    assert_eq!(env.room_id().as_str(), "42");
}

#[test]
fn decode_chat_keeps_message_verbatim() {
    let message = encode_shape_message(&sample_rect());
    let text = serde_json::json!({"type": "chat", "roomId": "1", "message": message}).to_string();
    let env = decode(&text).expect("chat should decode");
    match env {
        Frame::Chat { room_id, message: got, shape } => {
            assert_eq!(room_id.as_str(), "1");
            assert_eq!(got, message);
            assert_eq!(shape, sample_rect());
        }
        other => panic!("expected chat, got {other:?}"),
    }
}

#[test]
fn decode_rejects_unknown_type() {
    let err = decode(r#"{"type":"draw","roomId":"1"}"#).expect_err("unknown type");
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn decode_rejects_missing_room_id() {
    let err = decode(r#"{"type":"join_room"}"#).expect_err("missing roomId");
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn decode_rejects_empty_room_id() {
    let err = decode(r#"{"type":"join_room","roomId":""}"#).expect_err("empty roomId");
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn decode_rejects_chat_without_message() {
    let err = decode(r#"{"type":"chat","roomId":"1"}"#).expect_err("missing message");
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn decode_rejects_empty_chat_message() {
    let err = decode(r#"{"type":"chat","roomId":"1","message":""}"#).expect_err("empty message");
    assert!(matches!(err, DecodeError::EmptyMessage));
}

#[test]
fn decode_rejects_chat_message_that_is_not_a_shape() {
    let err = decode(r#"{"type":"chat","roomId":"1","message":"hello"}"#).expect_err("not a shape");
    assert!(matches!(err, DecodeError::NotAShape(_)));
}

#[test]
fn decode_rejects_non_json() {
    assert!(decode("not json").is_err());
}

// =============================================================================
// Envelope encoding
// =============================================================================

#[test]
fn encode_uses_wire_field_names() {
    let env = Envelope::chat(RoomId::from("7"), &sample_rect());
    let value: serde_json::Value = serde_json::from_str(&encode(&env)).expect("valid json");
    assert_eq!(value["type"], "chat");
    assert_eq!(value["roomId"], "7");
    assert!(value["message"].is_string());
}

#[test]
fn encode_join_room_shape() {
    let env = Envelope::JoinRoom { room_id: RoomId::from("3") };
    assert_eq!(encode(&env), r#"{"type":"join_room","roomId":"3"}"#);
}

#[test]
fn chat_envelope_decodes_back_to_its_shape() {
    let env = Envelope::chat(RoomId::from("1"), &sample_rect());
    let decoded = decode(&encode(&env)).expect("decode");
    let Frame::Chat { shape, .. } = decoded else {
        panic!("expected chat");
    };
    assert_eq!(shape, sample_rect());
}

#[test]
fn frame_chat_converts_to_wire_envelope() {
    let frame = Frame::chat(RoomId::from("2"), sample_rect());
    assert_eq!(Envelope::from(frame), Envelope::chat(RoomId::from("2"), &sample_rect()));
}

#[test]
fn decode_then_convert_keeps_message_text() {
    let text = r#"{"type":"chat","roomId":"1","message":"{\"shape\":{\"type\":\"rect\",\"x\":1,\"y\":2,\"width\":3,\"height\":4}}"}"#;
    let frame = decode(text).expect("chat");
    let Envelope::Chat { message, .. } = Envelope::from(frame) else {
        panic!("expected chat");
    };
    assert_eq!(message, r#"{"shape":{"type":"rect","x":1,"y":2,"width":3,"height":4}}"#);
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn rect_wire_layout() {
    let text = encode_shape_message(&sample_rect());
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["shape"]["type"], "rect");
    assert_eq!(value["shape"]["width"], 40.0);
    assert_eq!(value["shape"]["height"], 30.0);
}

#[test]
fn circle_uses_camel_case_fields() {
    let circle = Shape::Circle { center_x: 1.5, center_y: -2.0, radius: -3.25 };
    let text = encode_shape_message(&circle);
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["shape"]["type"], "circle");
    assert_eq!(value["shape"]["centerX"], 1.5);
    assert_eq!(value["shape"]["centerY"], -2.0);
    assert_eq!(decode_shape_message(&text).expect("circle"), circle);
}

#[test]
fn pencil_preserves_point_order() {
    let pencil = Shape::Pencil { points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 3.0)] };
    let decoded = decode_shape_message(&encode_shape_message(&pencil)).expect("pencil");
    assert_eq!(decoded, pencil);
}

#[test]
fn decode_shape_message_from_foreign_client() {
    let text = r#"{"shape":{"type":"pencil","points":[{"x":0.5,"y":0.25}]}}"#;
    let shape = decode_shape_message(text).expect("pencil");
    assert_eq!(shape, Shape::Pencil { points: vec![Point::new(0.5, 0.25)] });
}

#[test]
fn decode_shape_message_rejects_bare_shape() {
    let err = decode_shape_message(r#"{"type":"rect","x":0,"y":0,"width":1,"height":1}"#).expect_err("no wrapper");
    assert!(matches!(err, DecodeError::NotAShape(_)));
}

#[test]
fn shape_kind_matches_wire_tag() {
    assert_eq!(sample_rect().kind(), "rect");
    assert_eq!(Shape::Circle { center_x: 0.0, center_y: 0.0, radius: 1.0 }.kind(), "circle");
    assert_eq!(Shape::Pencil { points: vec![] }.kind(), "pencil");
}

#[test]
fn shapes_response_round_trip() {
    let body = ShapesResponse { shapes: vec![sample_rect()] };
    let text = serde_json::to_string(&body).expect("serialize");
    let back: ShapesResponse = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, body);
}
