//! Stats endpoint

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use super::ApiResponse;
use crate::api::websocket::state::AppState;

/// GET /api/stats - Current relay counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::new(state.relay.stats()))
}
