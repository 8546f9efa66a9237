//! Direct log ingest endpoint

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::ApiResponse;
use crate::api::websocket::state::AppState;

/// Response for POST /api/logs
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// False when the body was empty and nothing was queued
    pub queued: bool,
    /// Entries waiting for the next flush
    pub pending: usize,
}

/// POST /api/logs - Queue the raw request body as one log line
///
/// Treated exactly like a message from the log topic: the body is not
/// parsed, and an empty body is dropped. Once the relay has closed for
/// shutdown the line is refused with 503.
pub async fn ingest_log(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let queued = state.relay.ingest(Some(&body[..]));
    let status = if !queued && state.relay.is_closed() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::ACCEPTED
    };
    let response = IngestResponse {
        queued,
        pending: state.relay.pending_count(),
    };
    (status, Json(ApiResponse::new(response)))
}
