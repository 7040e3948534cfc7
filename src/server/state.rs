use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Settings;
use crate::session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<SessionRegistry>,
    /// Broadcast that tells per-connection tasks to close their transports
    pub shutdown: broadcast::Sender<()>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let (shutdown, _) = broadcast::channel(1);

        Self {
            settings: Arc::new(settings),
            registry: Arc::new(SessionRegistry::new()),
            shutdown,
            start_time: Instant::now(),
        }
    }
}
