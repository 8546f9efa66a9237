//! REST API module for HTTP endpoints
//!
//! - `GET /api/stats` - Relay counters
//! - `POST /api/logs` - Ingest one log line without going through Kafka

pub mod logs;
pub mod stats;

use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Unix timestamp when the response was built
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
