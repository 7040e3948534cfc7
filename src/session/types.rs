//! Session handle and statistics structures

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Registry entry for one live WebSocket session.
///
/// Exactly one handle exists per live transport; the socket driver creates
/// it on upgrade and removes it on teardown, so a handle never outlives its
/// transport.
pub struct SessionHandle {
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
    open: AtomicBool,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
            open: AtomicBool::new(true),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::Relaxed);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Session registry statistics
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub active_sessions: usize,
    pub total_opened: u64,
    pub total_closed: u64,
}
