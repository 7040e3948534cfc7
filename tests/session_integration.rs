//! Cross-component integration tests
//!
//! These tests exercise the session lifecycle, the session registry, and
//! the route table together without starting a real server or opening
//! sockets: sessions are driven directly through their hooks, the same
//! way the socket driver invokes them.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use echo_session_service::routing::RouteTarget;
use echo_session_service::server::default_route_table;
use echo_session_service::session::SessionRegistry;
use echo_session_service::websocket::{
    EchoSession, SessionContext, SessionHandler, SessionState,
};

fn new_context() -> (SessionContext, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(32);
    (SessionContext::new(Uuid::new_v4(), tx), rx)
}

// =============================================================================
// Session Lifecycle Integration Tests
// =============================================================================

#[tokio::test]
async fn test_full_session_scenario() {
    // connect -> Hello -> ping -> echo -> empty -> echo -> disconnect
    let (ctx, mut rx) = new_context();
    let mut session = EchoSession::new();

    session.on_open(&ctx).await;
    assert_eq!(rx.recv().await.unwrap(), "Hello");

    session.on_message(&ctx, "ping".to_string()).await;
    assert_eq!(rx.recv().await.unwrap(), "you said: ping");

    session.on_message(&ctx, String::new()).await;
    assert_eq!(rx.recv().await.unwrap(), "you said: ");

    session.on_close(&ctx).await;
    assert_eq!(session.state(), SessionState::Closed);

    // No further frames after closure
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_greeting_precedes_any_echo() {
    let (ctx, mut rx) = new_context();
    let mut session = EchoSession::new();

    session.on_open(&ctx).await;
    session.on_message(&ctx, "first".to_string()).await;

    assert_eq!(rx.recv().await.unwrap(), "Hello");
    assert_eq!(rx.recv().await.unwrap(), "you said: first");
}

#[tokio::test]
async fn test_replies_preserve_wire_order() {
    let (ctx, mut rx) = new_context();
    let mut session = EchoSession::new();

    session.on_open(&ctx).await;
    let _ = rx.recv().await; // greeting

    for payload in ["a", "b", "c"] {
        session.on_message(&ctx, payload.to_string()).await;
    }

    assert_eq!(rx.recv().await.unwrap(), "you said: a");
    assert_eq!(rx.recv().await.unwrap(), "you said: b");
    assert_eq!(rx.recv().await.unwrap(), "you said: c");
}

#[tokio::test]
async fn test_concurrent_sessions_are_isolated() {
    let (ctx_a, mut rx_a) = new_context();
    let (ctx_b, mut rx_b) = new_context();
    let mut session_a = EchoSession::new();
    let mut session_b = EchoSession::new();

    session_a.on_open(&ctx_a).await;
    session_b.on_open(&ctx_b).await;
    let _ = rx_a.recv().await;
    let _ = rx_b.recv().await;

    session_a.on_message(&ctx_a, "from a".to_string()).await;
    session_b.on_message(&ctx_b, "from b".to_string()).await;
    session_a.on_message(&ctx_a, "a again".to_string()).await;

    assert_eq!(rx_a.recv().await.unwrap(), "you said: from a");
    assert_eq!(rx_a.recv().await.unwrap(), "you said: a again");
    assert!(rx_a.try_recv().is_err());

    assert_eq!(rx_b.recv().await.unwrap(), "you said: from b");
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn test_closed_session_stays_silent() {
    let (ctx, mut rx) = new_context();
    let mut session = EchoSession::new();

    session.on_open(&ctx).await;
    let _ = rx.recv().await;
    session.on_close(&ctx).await;

    session.on_message(&ctx, "late".to_string()).await;
    session.on_close(&ctx).await;
    session.on_open(&ctx).await;

    assert_eq!(session.state(), SessionState::Closed);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_factory_sessions_do_not_share_state() {
    let factory = EchoSession::factory();
    let (ctx_a, mut rx_a) = new_context();
    let (ctx_b, mut rx_b) = new_context();

    let mut a = factory();
    let mut b = factory();

    a.on_open(&ctx_a).await;
    assert_eq!(rx_a.recv().await.unwrap(), "Hello");

    // b was never opened, so it must not echo
    b.on_message(&ctx_b, "early".to_string()).await;
    assert!(rx_b.try_recv().is_err());
}

// =============================================================================
// Session Registry Integration Tests
// =============================================================================

#[tokio::test]
async fn test_registry_tracks_session_lifecycle() {
    let registry = Arc::new(SessionRegistry::new());

    let a = registry.register();
    let b = registry.register();
    assert_eq!(registry.len(), 2);
    assert!(a.is_open());
    assert!(b.is_open());

    registry.unregister(a.id);
    registry.unregister(b.id);

    assert!(registry.is_empty());
    let stats = registry.stats();
    assert_eq!(stats.total_opened, 2);
    assert_eq!(stats.total_closed, 2);
    assert_eq!(stats.active_sessions, 0);
}

// =============================================================================
// Route Table Integration Tests
// =============================================================================

#[test]
fn test_default_route_table_covers_example_routes() {
    let table = default_route_table();

    assert!(matches!(
        table.resolve("/ws"),
        Some(RouteTarget::WebSocket(_))
    ));
    assert!(matches!(table.resolve("/"), Some(RouteTarget::Http(_))));
    assert!(matches!(
        table.resolve("/health"),
        Some(RouteTarget::Http(_))
    ));
    assert!(matches!(
        table.resolve("/stats"),
        Some(RouteTarget::Http(_))
    ));
    assert!(matches!(
        table.resolve("/metrics"),
        Some(RouteTarget::Http(_))
    ));

    assert!(table.resolve("/nonexistent").is_none());
}
