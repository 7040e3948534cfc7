use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use echo_session_service::config::Settings;
use echo_session_service::server::{create_app, AppState};
use echo_session_service::shutdown::GracefulShutdown;
use echo_session_service::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing; the guard must live until exit
    let _telemetry = telemetry::init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    // Create application state
    let state = AppState::new(settings.clone());
    tracing::info!("Application state initialized");

    let graceful = GracefulShutdown::new(state.registry.clone(), state.shutdown.clone());
    let shutdown_tx = state.shutdown.clone();

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler(shutdown_tx))
        .await?;

    // Wait for the remaining sessions to drain
    let result = graceful.execute("termination signal").await;

    tracing::info!(
        sessions_closed = result.sessions_closed,
        "Server shutdown complete"
    );
    Ok(())
}

async fn shutdown_signal_handler(shutdown_tx: tokio::sync::broadcast::Sender<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }

    // Tell per-connection tasks to close their transports
    let _ = shutdown_tx.send(());
}
