use std::collections::BTreeSet;

use super::*;

fn outbox() -> (Outbox, mpsc::Receiver<String>) {
    mpsc::channel(8)
}

fn room(id: &str) -> RoomId {
    RoomId::from(id)
}

fn register(registry: &mut Registry, user: &str) -> ConnectionId {
    let (tx, _rx) = outbox();
    registry.register(UserId::new(user), tx)
}

// =============================================================================
// register / deregister
// =============================================================================

#[test]
fn new_registry_is_empty() {
    let registry = Registry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn register_starts_with_no_rooms() {
    let mut registry = Registry::new();
    let id = register(&mut registry, "alice");
    assert_eq!(registry.connection_count(), 1);
    assert!(registry.rooms_of(id).expect("registered").is_empty());
    assert_eq!(registry.connection(id).expect("registered").user_id.as_str(), "alice");
}

#[test]
fn register_allocates_distinct_ids_in_order() {
    let mut registry = Registry::new();
    let a = register(&mut registry, "a");
    let b = register(&mut registry, "b");
    assert!(a < b);
}

#[test]
fn deregister_removes_connection_and_memberships() {
    let mut registry = Registry::new();
    let id = register(&mut registry, "d");
    registry.join(id, room("1"));
    registry.join(id, room("2"));

    let removed = registry.deregister(id).expect("was registered");
    assert_eq!(removed.rooms.len(), 2);
    assert!(registry.is_empty());
    assert!(registry.members(&room("1")).is_empty());
    assert!(registry.members(&room("2")).is_empty());
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn deregister_unknown_is_none() {
    let mut registry = Registry::new();
    let id = register(&mut registry, "x");
    registry.deregister(id);
    assert!(registry.deregister(id).is_none());
}

// =============================================================================
// join / leave set semantics
// =============================================================================

#[test]
fn duplicate_join_is_idempotent() {
    let mut registry = Registry::new();
    let id = register(&mut registry, "a");
    assert!(registry.join(id, room("1")));
    assert!(!registry.join(id, room("1")));
    assert_eq!(registry.members(&room("1")), vec![id]);
    assert_eq!(registry.recipients(&room("1")).len(), 1);
}

#[test]
fn leave_absent_room_is_noop() {
    let mut registry = Registry::new();
    let id = register(&mut registry, "a");
    assert!(!registry.leave(id, &room("9")));
    assert!(registry.rooms_of(id).expect("registered").is_empty());
}

#[test]
fn join_from_unknown_connection_does_nothing() {
    let mut registry = Registry::new();
    let id = register(&mut registry, "a");
    registry.deregister(id);
    assert!(!registry.join(id, room("1")));
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn membership_equals_joined_minus_left() {
    let ops: &[(&str, &str)] = &[
        ("join", "1"),
        ("join", "2"),
        ("join", "1"),
        ("leave", "3"),
        ("join", "3"),
        ("leave", "2"),
        ("leave", "2"),
        ("join", "4"),
        ("join", "2"),
        ("leave", "4"),
    ];

    let mut registry = Registry::new();
    let id = register(&mut registry, "a");
    let mut expected = BTreeSet::new();
    for (op, r) in ops {
        match *op {
            "join" => {
                registry.join(id, room(r));
                expected.insert(room(r));
            }
            _ => {
                registry.leave(id, &room(r));
                expected.remove(&room(r));
            }
        }
        assert_eq!(registry.rooms_of(id).expect("registered"), &expected);
    }

    for r in ["1", "2", "3", "4"] {
        let is_member = registry.members(&room(r)).contains(&id);
        assert_eq!(is_member, expected.contains(&room(r)), "room {r}");
    }
}

// =============================================================================
// recipients
// =============================================================================

#[test]
fn recipients_are_exactly_current_members() {
    let mut registry = Registry::new();
    let a = register(&mut registry, "a");
    let b = register(&mut registry, "b");
    let c = register(&mut registry, "c");
    let d = register(&mut registry, "d");
    registry.join(a, room("1"));
    registry.join(b, room("2"));
    registry.join(c, room("1"));
    registry.join(d, room("1"));
    registry.leave(d, &room("1"));

    let ids: Vec<ConnectionId> = registry.recipients(&room("1")).into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn recipients_follow_registration_order_not_join_order() {
    let mut registry = Registry::new();
    let a = register(&mut registry, "a");
    let b = register(&mut registry, "b");
    registry.join(b, room("1"));
    registry.join(a, room("1"));
    assert_eq!(registry.members(&room("1")), vec![a, b]);
}

#[test]
fn recipients_of_unknown_room_is_empty() {
    let registry = Registry::new();
    assert!(registry.recipients(&room("nowhere")).is_empty());
}

#[test]
fn empty_rooms_are_dropped_from_index() {
    let mut registry = Registry::new();
    let a = register(&mut registry, "a");
    registry.join(a, room("1"));
    assert_eq!(registry.room_count(), 1);
    registry.leave(a, &room("1"));
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn connection_id_display() {
    let mut registry = Registry::new();
    let a = register(&mut registry, "a");
    assert_eq!(a.to_string(), "conn-0");
}
