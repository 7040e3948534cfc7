// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain layer (session lifecycle)
pub mod session;
pub mod websocket;

// Application layer
pub mod api;
pub mod routing;
pub mod server;

// Supporting modules
pub mod shutdown;
