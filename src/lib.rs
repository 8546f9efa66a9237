//! Log Relay
//!
//! Consumes log lines from a Kafka topic, buffers them for a fixed window
//! and fans every buffered line out to all connected WebSocket clients.
//!
//! # Modules
//!
//! - `types`: Log entry payloads
//! - `relay`: Pending queue, subscriber registry, flush and the flusher task
//! - `ingest`: Inbound Kafka consumer
//! - `api`: HTTP router, WebSocket subscribers and REST endpoints
//! - `config`: Command line and environment settings
//! - `logging`: Tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use log_relay::relay::{BatchFlusher, LogRelay, RelayConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() {
//! let relay = Arc::new(LogRelay::new(RelayConfig::default()));
//! let shutdown = CancellationToken::new();
//! let flusher = BatchFlusher::new(Arc::clone(&relay)).spawn(shutdown.clone());
//!
//! let mut sub = relay.subscribe();
//! relay.ingest(Some(br#"{"level":"info","message":"hello"}"#));
//! let line = sub.receiver.recv().await;
//!
//! shutdown.cancel();
//! let _ = flusher.await;
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod relay;
pub mod types;

// Re-export commonly used items at crate root
pub use config::Config;
pub use error::{RelayError, RelayResult};
pub use relay::{FlushReport, LogRelay, RelayConfig, SubscriberId, Subscription};
pub use types::LogEntry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
