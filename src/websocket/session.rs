//! Connection-scoped echo session with lifecycle hooks.
//!
//! A session is created per accepted WebSocket upgrade and driven entirely
//! by the socket driver in `handler.rs`: `on_open` once after the upgrade,
//! `on_message` once per received text frame in wire order, `on_close`
//! exactly once on teardown. Hooks never run concurrently for the same
//! session.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::metrics::FrameMetrics;

/// Text frame sent to the peer immediately after a successful upgrade.
pub const GREETING: &str = "Hello";

/// Prefix prepended to every echoed text frame.
pub const ECHO_PREFIX: &str = "you said: ";

/// Per-session context handed to lifecycle hooks by the socket driver.
///
/// Holds the outbound half of the connection: hooks enqueue text frames
/// here and the driver's send task writes them to the wire in enqueue
/// order. The context is owned by the driver and dropped on teardown,
/// which releases the transport handle.
pub struct SessionContext {
    id: Uuid,
    outbound: mpsc::Sender<String>,
}

impl SessionContext {
    pub fn new(id: Uuid, outbound: mpsc::Sender<String>) -> Self {
        Self { id, outbound }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Enqueue a text frame for delivery to the peer.
    ///
    /// Delivery is fire-and-forget: a send failure means the transport is
    /// already gone and surfaces to the session only as the upcoming
    /// `on_close`.
    pub async fn send_text(
        &self,
        text: impl Into<String>,
    ) -> Result<(), mpsc::error::SendError<String>> {
        self.outbound.send(text.into()).await
    }
}

/// Lifecycle hooks for one WebSocket connection.
///
/// Implementations are invoked only by the socket driver, never by
/// application code. Invocations for a given connection are strictly
/// sequential and non-overlapping.
#[async_trait]
pub trait SessionHandler: Send {
    /// Fires once, immediately after the upgrade succeeds.
    async fn on_open(&mut self, ctx: &SessionContext);

    /// Fires once per received text frame, in the order frames arrive.
    async fn on_message(&mut self, ctx: &SessionContext, text: String);

    /// Fires exactly once when the transport is torn down, regardless of
    /// which side initiated closure.
    async fn on_close(&mut self, ctx: &SessionContext);
}

/// Factory producing a fresh handler for each accepted connection.
///
/// The route table stores one of these per WebSocket route, so handler
/// construction stays a closure rather than an inheritance chain.
pub type SessionFactory = Arc<dyn Fn() -> Box<dyn SessionHandler> + Send + Sync>;

/// Session lifecycle states.
///
/// Connecting -> Open on successful upgrade, Open -> Closed on transport
/// teardown or local close. Closed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

/// The echo session: greets the peer on open and echoes every text frame
/// back with [`ECHO_PREFIX`] prepended. Any text is valid input, including
/// the empty string; payloads are never validated or escaped.
pub struct EchoSession {
    state: SessionState,
}

impl EchoSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn factory() -> SessionFactory {
        Arc::new(|| Box::new(EchoSession::new()))
    }
}

impl Default for EchoSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionHandler for EchoSession {
    async fn on_open(&mut self, ctx: &SessionContext) {
        if self.state != SessionState::Connecting {
            return;
        }
        self.state = SessionState::Open;

        let _ = ctx.send_text(GREETING).await;
        tracing::info!(session_id = %ctx.id(), "session opened");
    }

    async fn on_message(&mut self, ctx: &SessionContext, text: String) {
        // Sending outside Open is a no-op, never an error
        if self.state != SessionState::Open {
            tracing::debug!(
                session_id = %ctx.id(),
                state = ?self.state,
                "dropping frame received outside Open state"
            );
            return;
        }

        let _ = ctx.send_text(format!("{ECHO_PREFIX}{text}")).await;
        FrameMetrics::record_echoed();
    }

    async fn on_close(&mut self, ctx: &SessionContext) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;

        tracing::info!(session_id = %ctx.id(), "session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> (SessionContext, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (SessionContext::new(Uuid::new_v4(), tx), rx)
    }

    #[tokio::test]
    async fn test_greeting_sent_on_open() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;

        assert_eq!(rx.recv().await.unwrap(), "Hello");
        assert_eq!(session.state(), SessionState::Open);
        // Exactly one frame
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_open_fires_once() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        session.on_open(&ctx).await;

        assert_eq!(rx.recv().await.unwrap(), "Hello");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_echo_prepends_prefix() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        let _ = rx.recv().await; // greeting

        session.on_message(&ctx, "ping".to_string()).await;
        assert_eq!(rx.recv().await.unwrap(), "you said: ping");
    }

    #[tokio::test]
    async fn test_empty_payload_is_valid() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        let _ = rx.recv().await;

        session.on_message(&ctx, String::new()).await;
        assert_eq!(rx.recv().await.unwrap(), "you said: ");
    }

    #[tokio::test]
    async fn test_payload_is_not_escaped() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        let _ = rx.recv().await;

        let payload = "{\"weird\": \"<payload>\"}\n\tyou said: nested";
        session.on_message(&ctx, payload.to_string()).await;
        assert_eq!(rx.recv().await.unwrap(), format!("you said: {payload}"));
    }

    #[tokio::test]
    async fn test_message_before_open_is_noop() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_message(&ctx, "early".to_string()).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(session.state(), SessionState::Connecting);
    }

    #[tokio::test]
    async fn test_message_after_close_is_noop() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        let _ = rx.recv().await;
        session.on_close(&ctx).await;

        session.on_message(&ctx, "late".to_string()).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (ctx, _rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        session.on_close(&ctx).await;
        session.on_close(&ctx).await;

        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_closed_is_terminal() {
        let (ctx, mut rx) = test_context();
        let mut session = EchoSession::new();

        session.on_open(&ctx).await;
        let _ = rx.recv().await;
        session.on_close(&ctx).await;

        // Re-opening a closed session is not a transition
        session.on_open(&ctx).await;

        assert_eq!(session.state(), SessionState::Closed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_factory_produces_fresh_sessions() {
        let factory = EchoSession::factory();
        let _a = factory();
        let _b = factory();
        // Each call yields an independent boxed handler
    }
}
