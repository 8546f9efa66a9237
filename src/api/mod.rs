//! API module for HTTP and WebSocket endpoints
//!
//! Serves the live log stream over WebSocket plus a small REST surface for
//! health, relay stats and direct log ingest.

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::create_router;
pub use websocket::state::AppState;
