//! WebSocket upgrade handling and socket driving.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::metrics::{FrameMetrics, SessionMetrics};
use crate::server::AppState;

use super::session::{SessionContext, SessionFactory};

/// Upgrade an HTTP request into a WebSocket session.
///
/// The route table hands each WebSocket route's session factory to this
/// entry point; every accepted connection gets a fresh handler instance.
/// The inbound frame size cap is the transport layer's job and is
/// configured here from settings.
pub fn upgrade(ws: WebSocketUpgrade, state: AppState, factory: SessionFactory) -> Response {
    let max_message_size = state.settings.websocket.max_message_size;

    ws.max_message_size(max_message_size)
        .on_upgrade(move |socket| drive_socket(socket, state, factory))
}

/// Drive an upgraded socket through its session's lifecycle hooks.
///
/// This task owns the receive loop, so hook invocations for a connection
/// are strictly sequential: each hook is awaited before the next inbound
/// frame is pulled. A separate send task drains the outbound channel,
/// preserving enqueue order on the wire.
#[tracing::instrument(
    name = "ws.connection",
    skip(socket, state, factory),
    fields(otel.kind = "server")
)]
async fn drive_socket(socket: WebSocket, state: AppState, factory: SessionFactory) {
    let connection_start = std::time::Instant::now();

    let handle = state.registry.register();
    let session_id = handle.id;

    let (tx, mut rx) = mpsc::channel::<String>(state.settings.websocket.channel_buffer);
    let ctx = SessionContext::new(session_id, tx);
    let mut session = factory();

    SessionMetrics::record_opened();
    tracing::info!(session_id = %session_id, "WebSocket connection established");

    // Split socket into sender and receiver
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Task for writing queued frames to the wire
    let send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    session.on_open(&ctx).await;

    // Inbound loop: one frame at a time, in wire order. A shutdown signal
    // closes the session the same way a peer disconnect would.
    let mut shutdown_rx = state.shutdown.subscribe();
    loop {
        tokio::select! {
            result = ws_receiver.next() => {
                match result {
                    Some(Ok(msg)) => {
                        if !process_frame(msg, &ctx, session.as_mut()).await {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        // Transport errors surface to the session only as closure
                        tracing::warn!(session_id = %session_id, error = %e, "WebSocket receive error");
                        break;
                    }
                    None => break,
                }
            }
            _ = shutdown_rx.recv() => {
                tracing::debug!(session_id = %session_id, "Closing session for shutdown");
                break;
            }
        }
    }

    session.on_close(&ctx).await;
    state.registry.unregister(session_id);

    // Drop the hooks' sender so the send task drains and exits
    drop(ctx);
    let _ = send_task.await;

    let duration = connection_start.elapsed().as_secs_f64();
    SessionMetrics::record_closed(duration);

    tracing::info!(
        session_id = %session_id,
        duration_secs = duration,
        "WebSocket connection closed"
    );
}

/// Dispatch a received frame into the session.
/// Returns false if the connection should be torn down.
async fn process_frame(
    msg: Message,
    ctx: &SessionContext,
    session: &mut dyn super::session::SessionHandler,
) -> bool {
    match msg {
        Message::Text(text) => {
            FrameMetrics::record_text();
            session.on_message(ctx, text.to_string()).await;
            true
        }
        Message::Binary(_) => {
            // Text frames only; binary payloads are dropped
            FrameMetrics::record_binary();
            tracing::debug!(session_id = %ctx.id(), "Ignoring binary frame");
            true
        }
        Message::Ping(_) | Message::Pong(_) => {
            // Axum answers pings itself
            FrameMetrics::record_control();
            true
        }
        Message::Close(_) => {
            FrameMetrics::record_close();
            tracing::debug!(session_id = %ctx.id(), "Received close frame");
            false
        }
    }
}
