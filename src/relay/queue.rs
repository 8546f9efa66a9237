//! Pending entries awaiting the next flush

use parking_lot::Mutex;

use crate::types::LogEntry;

/// Ordered buffer of entries ingested since the last flush.
///
/// The lock is held only for a single append or a drain, never while
/// entries are being delivered. Once closed the queue refuses new entries,
/// so nothing can land behind the final drain.
#[derive(Debug, Default)]
pub struct PendingQueue {
    state: Mutex<QueueState>,
}

#[derive(Debug, Default)]
struct QueueState {
    entries: Vec<LogEntry>,
    closed: bool,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry, keeping ingest order. Returns false once closed.
    pub fn push(&self, entry: LogEntry) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.entries.push(entry);
        true
    }

    /// Take everything buffered so far and leave the queue empty
    pub fn drain(&self) -> Vec<LogEntry> {
        std::mem::take(&mut self.state.lock().entries)
    }

    /// Refuse further pushes and take what is left
    pub fn close(&self) -> Vec<LogEntry> {
        let mut state = self.state.lock();
        state.closed = true;
        std::mem::take(&mut state.entries)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_drain_preserves_order_and_clears() {
        let queue = PendingQueue::new();
        queue.push(LogEntry::from("log1"));
        queue.push(LogEntry::from("log2"));

        let batch = queue.drain();
        assert_eq!(batch, vec![LogEntry::from("log1"), LogEntry::from("log2")]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_close_drains_and_rejects_pushes() {
        let queue = PendingQueue::new();
        assert!(queue.push(LogEntry::from("before")));

        assert_eq!(queue.close(), vec![LogEntry::from("before")]);
        assert!(queue.is_closed());
        assert!(!queue.push(LogEntry::from("after")));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_pushes_are_not_lost() {
        let queue = Arc::new(PendingQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        queue.push(LogEntry::from(format!("t{}-{}", t, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let batch = queue.drain();
        assert_eq!(batch.len(), 1000);

        // Per-producer order survives interleaving
        let t0: Vec<_> = batch
            .iter()
            .filter(|e| e.as_str().starts_with("t0-"))
            .map(|e| e.as_str().to_string())
            .collect();
        let expected: Vec<_> = (0..250).map(|i| format!("t0-{}", i)).collect();
        assert_eq!(t0, expected);
    }
}
