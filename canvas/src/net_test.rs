use futures::executor::block_on;

use super::*;

struct FixedSource(Result<Vec<Shape>, u16>);

impl ShapeSource for FixedSource {
    async fn fetch_shapes(&self, _room_id: &RoomId) -> Result<Vec<Shape>, PersistenceError> {
        self.0.clone().map_err(PersistenceError::Status)
    }
}

fn rect() -> Shape {
    Shape::Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 }
}

#[test]
fn shapes_url_joins_base_and_room() {
    assert_eq!(shapes_url("http://localhost:8080", &RoomId::from("7")), "http://localhost:8080/api/rooms/7/shapes");
}

#[test]
fn shapes_url_trims_trailing_slash() {
    assert_eq!(shapes_url("http://h/", &RoomId::from("a")), "http://h/api/rooms/a/shapes");
}

#[test]
fn shapes_url_same_origin() {
    assert_eq!(shapes_url("", &RoomId::from("1")), "/api/rooms/1/shapes");
}

#[test]
fn shapes_url_escapes_reserved_characters_in_room() {
    assert_eq!(shapes_url("", &RoomId::from("a/b?c")), "/api/rooms/a%2Fb%3Fc/shapes");
    assert_eq!(shapes_url("", &RoomId::from("x#y z")), "/api/rooms/x%23y%20z/shapes");
}

#[test]
fn shapes_url_keeps_unreserved_characters() {
    assert_eq!(shapes_url("", &RoomId::from("team-1_a.b~c")), "/api/rooms/team-1_a.b~c/shapes");
}

#[test]
fn shapes_url_encodes_non_ascii_as_utf8() {
    assert_eq!(shapes_url("", &RoomId::from("é")), "/api/rooms/%C3%A9/shapes");
}

#[test]
fn fetch_seed_returns_source_shapes() {
    let source = FixedSource(Ok(vec![rect(), rect()]));
    assert_eq!(block_on(fetch_seed(&source, &RoomId::from("1"))), vec![rect(), rect()]);
}

#[test]
fn fetch_seed_degrades_to_empty() {
    let source = FixedSource(Err(503));
    assert!(block_on(fetch_seed(&source, &RoomId::from("1"))).is_empty());
}

#[test]
fn persistence_error_messages() {
    assert_eq!(PersistenceError::Status(404).to_string(), "persistence returned status 404");
    assert_eq!(
        PersistenceError::Unavailable("offline".into()).to_string(),
        "persistence unavailable: offline"
    );
}
