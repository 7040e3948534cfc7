mod app;
mod state;

pub use app::{create_app, default_route_table};
pub use state::AppState;
