//! WebSocket application state

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::relay::LogRelay;

/// Shared application state for HTTP and WebSocket handlers
pub struct AppState {
    /// The relay every connection subscribes to
    pub relay: Arc<LogRelay>,

    /// Upgraded connections. They outlive the HTTP server's graceful
    /// shutdown, so the process waits on these after the relay closes.
    pub connections: TaskTracker,
}

impl AppState {
    /// Create a new AppState around a running relay
    pub fn new(relay: Arc<LogRelay>) -> Self {
        Self {
            relay,
            connections: TaskTracker::new(),
        }
    }
}
