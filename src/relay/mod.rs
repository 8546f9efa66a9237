//! Log relay core
//!
//! Owns the pending queue, the subscriber registry and the counters. Ingest
//! appends to the queue; each flush drains it and fans every entry out to
//! every subscriber connected at that moment.
//!
//! ## Guarantees
//! - Entries reach each subscriber in ingest order
//! - A flush with nothing pending sends nothing
//! - A failed send to one subscriber never affects the others
//! - Subscribers only see entries flushed after they connected

pub mod flusher;
pub mod queue;
pub mod registry;
pub mod stats;

use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::types::LogEntry;

pub use flusher::BatchFlusher;
pub use queue::PendingQueue;
pub use registry::{SubscriberId, SubscriberRegistry, Subscription};
pub use stats::{RelayStats, StatsSnapshot};

/// Settings for the relay core
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Time between flushes
    pub flush_interval: Duration,
    /// Entries buffered per subscriber channel
    pub subscriber_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_millis(crate::config::DEFAULT_FLUSH_INTERVAL_MS),
            subscriber_buffer: crate::config::DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

/// Outcome of one flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries drained from the queue
    pub entries: usize,
    /// Subscribers the batch was fanned out to
    pub subscribers: usize,
    /// Successful per-subscriber sends
    pub delivered: usize,
    /// Sends that failed (full or closed channel)
    pub failed: usize,
    /// Subscribers removed because their channel was closed
    pub removed: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Buffers inbound log lines and fans them out on each flush
#[derive(Debug)]
pub struct LogRelay {
    config: RelayConfig,
    queue: PendingQueue,
    registry: SubscriberRegistry,
    stats: RelayStats,
}

impl LogRelay {
    pub fn new(config: RelayConfig) -> Self {
        let registry = SubscriberRegistry::new(config.subscriber_buffer);
        Self {
            config,
            queue: PendingQueue::new(),
            registry,
            stats: RelayStats::new(),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Ingest one raw message payload.
    ///
    /// Missing or empty payloads are dropped silently, as is anything that
    /// arrives after [`close`](Self::close). Returns whether the payload was
    /// queued.
    pub fn ingest(&self, payload: Option<&[u8]>) -> bool {
        match LogEntry::from_payload(payload) {
            Some(entry) => self.push(entry),
            None => {
                self.stats.record_dropped();
                debug!("Dropped message without payload");
                false
            }
        }
    }

    /// Queue an already decoded entry. Returns false once the relay is closed.
    pub fn push(&self, entry: LogEntry) -> bool {
        if self.queue.push(entry) {
            self.stats.record_ingested();
            true
        } else {
            self.stats.record_dropped();
            debug!("Relay closed, dropping message");
            false
        }
    }

    /// Drain the queue and send every entry to every current subscriber
    pub fn flush(&self) -> FlushReport {
        self.fan_out(self.queue.drain())
    }

    /// Final flush.
    ///
    /// Stops accepting entries, delivers whatever is pending, then ends
    /// every subscription so receivers see the remaining entries followed
    /// by `None`.
    pub fn close(&self) -> FlushReport {
        let report = self.fan_out(self.queue.close());
        let ended = self.registry.close();
        debug!(subscribers = ended, "Relay closed");
        report
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    fn fan_out(&self, batch: Vec<LogEntry>) -> FlushReport {
        if batch.is_empty() {
            return FlushReport::default();
        }

        let subscribers = self.registry.snapshot();
        let mut report = FlushReport {
            entries: batch.len(),
            subscribers: subscribers.len(),
            ..FlushReport::default()
        };

        for (id, tx) in subscribers {
            for entry in &batch {
                match tx.try_send(entry.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        report.failed += 1;
                        warn!(subscriber = %id, "Subscriber buffer full, dropping entry");
                    }
                    Err(TrySendError::Closed(_)) => {
                        report.failed += 1;
                        if self.registry.unregister(id) {
                            report.removed += 1;
                        }
                        debug!(subscriber = %id, "Subscriber channel closed during flush");
                        break;
                    }
                }
            }
        }

        self.stats
            .record_flush(report.delivered as u64, report.failed as u64);
        debug!(
            entries = report.entries,
            subscribers = report.subscribers,
            delivered = report.delivered,
            failed = report.failed,
            "Flushed log batch"
        );
        report
    }

    /// Register a newly connected subscriber
    pub fn subscribe(&self) -> Subscription {
        self.registry.register()
    }

    /// Remove a subscriber after it disconnects
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.registry.unregister(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.queue.len(), self.registry.len())
    }
}

impl Default for LogRelay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}
