//! Timer-driven batch flusher

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::LogRelay;

/// Flushes the relay on a fixed interval until cancelled
pub struct BatchFlusher {
    relay: Arc<LogRelay>,
    flush_interval: Duration,
}

impl BatchFlusher {
    /// Create a flusher using the relay's configured interval
    pub fn new(relay: Arc<LogRelay>) -> Self {
        let flush_interval = relay.config().flush_interval;
        Self {
            relay,
            flush_interval,
        }
    }

    /// Create a flusher with a custom interval
    pub fn with_interval(relay: Arc<LogRelay>, flush_interval: Duration) -> Self {
        Self {
            relay,
            flush_interval,
        }
    }

    /// Run until `shutdown` fires, then close the relay with a final flush.
    ///
    /// Cancel `shutdown` only after every ingest path has stopped; anything
    /// ingested afterwards is refused.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut timer = interval(self.flush_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        timer.tick().await;

        debug!(interval_ms = self.flush_interval.as_millis() as u64, "Batch flusher started");

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.relay.flush();
                }

                _ = shutdown.cancelled() => {
                    let report = self.relay.close();
                    info!(entries = report.entries, "Batch flusher stopped after final flush");
                    break;
                }
            }
        }
    }

    /// Spawn the flusher onto the current runtime
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
