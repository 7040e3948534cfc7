//! Graceful shutdown handling for the echo service.
//!
//! Shutdown runs in two phases:
//! 1. Signal per-connection tasks, which close their transports and run
//!    the sessions' `on_close` hooks
//! 2. Wait, bounded by a timeout, for the session registry to drain

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

use crate::session::SessionRegistry;

/// Configuration for graceful shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Time to wait for live sessions to close (default: 10 seconds)
    pub drain_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(10),
        }
    }
}

/// Handles graceful shutdown of the echo service
pub struct GracefulShutdown {
    registry: Arc<SessionRegistry>,
    shutdown_tx: broadcast::Sender<()>,
    config: ShutdownConfig,
}

impl GracefulShutdown {
    /// Create a new graceful shutdown handler
    pub fn new(registry: Arc<SessionRegistry>, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            registry,
            shutdown_tx,
            config: ShutdownConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(
        registry: Arc<SessionRegistry>,
        shutdown_tx: broadcast::Sender<()>,
        config: ShutdownConfig,
    ) -> Self {
        Self {
            registry,
            shutdown_tx,
            config,
        }
    }

    /// Execute graceful shutdown sequence
    #[tracing::instrument(
        name = "graceful_shutdown",
        skip(self),
        fields(active_sessions = self.registry.len())
    )]
    pub async fn execute(&self, reason: &str) -> ShutdownResult {
        let start = std::time::Instant::now();
        let mut result = ShutdownResult::default();

        // Phase 1: Tell per-connection tasks to close their transports
        tracing::info!(reason = %reason, "Starting graceful shutdown - Phase 1: Signaling session tasks");
        let _ = self.shutdown_tx.send(());

        // Phase 2: Wait for the registry to drain
        tracing::info!("Phase 2: Waiting for sessions to close");
        result.sessions_closed = self.wait_for_sessions_to_close().await;

        result.duration = start.elapsed();
        result.success = true;

        tracing::info!(
            sessions_closed = result.sessions_closed,
            duration_ms = result.duration.as_millis() as u64,
            "Graceful shutdown completed"
        );

        result
    }

    /// Wait for sessions to close gracefully
    async fn wait_for_sessions_to_close(&self) -> usize {
        let initial = self.registry.len();
        if initial == 0 {
            return 0;
        }

        let wait_future = async {
            loop {
                tokio::time::sleep(Duration::from_millis(100)).await;
                if self.registry.is_empty() {
                    break;
                }
            }
        };

        let _ = timeout(self.config.drain_timeout, wait_future).await;

        let remaining = self.registry.len();
        if remaining > 0 {
            tracing::warn!(
                remaining_sessions = remaining,
                "Some sessions did not close gracefully"
            );
        }

        initial - remaining
    }
}

/// Result of a graceful shutdown operation
#[derive(Debug, Default)]
pub struct ShutdownResult {
    /// Whether shutdown completed successfully
    pub success: bool,
    /// Number of sessions that closed during the drain window
    pub sessions_closed: usize,
    /// Total time taken for shutdown
    pub duration: Duration,
}
