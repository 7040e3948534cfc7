//! Route table - ordered path-to-handler registrations.
//!
//! Paths are matched as exact strings. Duplicate patterns are allowed at
//! registration time and the last registration wins, both in [`RouteTable::resolve`]
//! and in the built router. Paths with no entry fall through to the
//! server's not-found fallback.

use axum::extract::{State, WebSocketUpgrade};
use axum::routing::get;
use axum::Router;

use crate::server::AppState;
use crate::websocket::{self, SessionFactory};

/// Where a route dispatches to.
pub enum RouteTarget {
    /// WebSocket upgrade endpoint. Each accepted connection gets a fresh
    /// handler from the factory.
    WebSocket(SessionFactory),
    /// Plain HTTP endpoint.
    Http(axum::routing::MethodRouter<AppState>),
}

struct RouteEntry {
    pattern: String,
    target: RouteTarget,
}

/// Ordered collection of route registrations.
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry. Re-registering an existing pattern shadows the
    /// previous target.
    pub fn register(&mut self, pattern: impl Into<String>, target: RouteTarget) {
        self.entries.push(RouteEntry {
            pattern: pattern.into(),
            target,
        });
    }

    /// Look up the target for a path. Exact-string match, newest
    /// registration first.
    pub fn resolve(&self, path: &str) -> Option<&RouteTarget> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.pattern == path)
            .map(|e| &e.target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the axum router serving this table.
    ///
    /// Shadowed duplicates are skipped rather than mounted, since axum
    /// rejects registering the same path twice.
    pub fn into_router(self) -> Router<AppState> {
        let mut router = Router::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let shadowed = self.entries[i + 1..]
                .iter()
                .any(|later| later.pattern == entry.pattern);
            if shadowed {
                continue;
            }

            let method_router = match &entry.target {
                RouteTarget::WebSocket(factory) => {
                    let factory = factory.clone();
                    get(move |ws: WebSocketUpgrade, State(state): State<AppState>| {
                        let factory = factory.clone();
                        async move { websocket::upgrade(ws, state, factory) }
                    })
                }
                RouteTarget::Http(method_router) => method_router.clone(),
            };

            router = router.route(&entry.pattern, method_router);
        }

        router
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
