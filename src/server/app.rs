use axum::{http::Uri, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::api::{health, prometheus_metrics, root, stats};
use crate::error::AppError;
use crate::routing::{RouteTable, RouteTarget};
use crate::websocket::EchoSession;

use super::AppState;

/// Largest HTTP request body accepted, enforced at the transport layer
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Default route registrations: the echo WebSocket endpoint, the
/// placeholder root, and the observability endpoints.
pub fn default_route_table() -> RouteTable {
    let mut table = RouteTable::new();
    table.register("/ws", RouteTarget::WebSocket(EchoSession::factory()));
    table.register("/", RouteTarget::Http(get(root).post(root)));
    table.register("/health", RouteTarget::Http(get(health)));
    table.register("/stats", RouteTarget::Http(get(stats)));
    table.register("/metrics", RouteTarget::Http(get(prometheus_metrics)));
    table
}

pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    default_route_table()
        .into_router()
        .fallback(not_found)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        // Add state
        .with_state(state)
}

/// Paths outside the route table answer 404 with the standard error body.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
