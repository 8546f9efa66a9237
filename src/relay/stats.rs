//! Relay counters exposed on the stats endpoint

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use serde::Serialize;

/// Monotonic counters updated by ingest and flush
#[derive(Debug)]
pub struct RelayStats {
    ingested: AtomicU64,
    dropped: AtomicU64,
    flushes: AtomicU64,
    delivered: AtomicU64,
    failed_sends: AtomicU64,
    started_at: i64,
    last_flush_at: AtomicI64,
}

/// Point-in-time view of the relay
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ingested: u64,
    pub dropped: u64,
    pub flushes: u64,
    pub delivered: u64,
    pub failed_sends: u64,
    pub pending: usize,
    pub subscribers: usize,
    /// Unix timestamp when the relay was created
    pub started_at: i64,
    /// Unix timestamp of the last non-empty flush
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_flush_at: Option<i64>,
}

impl RelayStats {
    pub fn new() -> Self {
        Self {
            ingested: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed_sends: AtomicU64::new(0),
            started_at: chrono::Utc::now().timestamp(),
            last_flush_at: AtomicI64::new(0),
        }
    }

    pub fn record_ingested(&self) {
        self.ingested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flush(&self, delivered: u64, failed: u64) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.delivered.fetch_add(delivered, Ordering::Relaxed);
        self.failed_sends.fetch_add(failed, Ordering::Relaxed);
        self.last_flush_at
            .store(chrono::Utc::now().timestamp(), Ordering::Relaxed);
    }

    pub fn snapshot(&self, pending: usize, subscribers: usize) -> StatsSnapshot {
        let last_flush_at = self.last_flush_at.load(Ordering::Relaxed);
        StatsSnapshot {
            ingested: self.ingested.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed_sends: self.failed_sends.load(Ordering::Relaxed),
            pending,
            subscribers,
            started_at: self.started_at,
            last_flush_at: (last_flush_at > 0).then_some(last_flush_at),
        }
    }
}

impl Default for RelayStats {
    fn default() -> Self {
        Self::new()
    }
}
