use super::*;

#[tokio::test]
async fn new_state_has_empty_registry() {
    let state = test_helpers::test_app_state();
    assert!(state.registry.lock().await.is_empty());
}

#[tokio::test]
async fn from_config_carries_limits() {
    let config = ServerConfig {
        bind_addr: "127.0.0.1".into(),
        port: 0,
        auth_secret: "k".into(),
        room_history_limit: 7,
        client_channel_capacity: 3,
    };
    let state = AppState::from_config(&config);
    assert_eq!(state.history.read().await.limit(), 7);
    assert_eq!(state.client_channel_capacity, 3);
}

#[test]
fn from_config_verifies_with_configured_secret() {
    let config = ServerConfig {
        bind_addr: "127.0.0.1".into(),
        port: 0,
        auth_secret: "k".into(),
        room_history_limit: 1,
        client_channel_capacity: 1,
    };
    let state = AppState::from_config(&config);
    let token = crate::services::auth::sign("k", "u1");
    assert_eq!(state.verifier.verify(&token).expect("valid").as_str(), "u1");
}

#[test]
fn clones_share_the_registry() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    assert!(Arc::ptr_eq(&state.registry, &clone.registry));
}
