//! WebSocket module for live log tailing
//!
//! Provides the WebSocket endpoint at `/ws`. Every connection becomes one
//! subscriber of the relay and receives each flushed log line as a separate
//! text frame, exactly as the producer published it.
//!
//! ## Behavior
//! - Only lines flushed after the connection opened are delivered
//! - Lines arrive in ingest order
//! - Closing the socket removes the subscriber before the next flush

pub mod handler;
pub mod state;
