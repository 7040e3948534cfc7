use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::types::{SessionHandle, SessionStats};

/// Tracks all live WebSocket sessions.
///
/// The registry is bookkeeping only: sessions never reach into each other
/// through it, and nothing here is on the per-frame path. It exists so
/// health/stats endpoints can report counts and graceful shutdown can wait
/// for drain.
pub struct SessionRegistry {
    /// session_id -> SessionHandle
    sessions: DashMap<Uuid, Arc<SessionHandle>>,
    opened: AtomicU64,
    closed: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            opened: AtomicU64::new(0),
            closed: AtomicU64::new(0),
        }
    }

    /// Register a new session and return its handle
    pub fn register(&self) -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle::new());
        self.sessions.insert(handle.id, handle.clone());
        self.opened.fetch_add(1, Ordering::Relaxed);

        tracing::info!(session_id = %handle.id, "Session registered");

        handle
    }

    /// Unregister a session
    pub fn unregister(&self, session_id: Uuid) {
        if let Some((_, handle)) = self.sessions.remove(&session_id) {
            handle.mark_closed();
            self.closed.fetch_add(1, Ordering::Relaxed);

            tracing::info!(session_id = %session_id, "Session unregistered");
        }
    }

    /// Get a session handle by ID
    pub fn get(&self, session_id: Uuid) -> Option<Arc<SessionHandle>> {
        self.sessions.get(&session_id).map(|h| h.clone())
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Get statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            active_sessions: self.sessions.len(),
            total_opened: self.opened.load(Ordering::Relaxed),
            total_closed: self.closed.load(Ordering::Relaxed),
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
