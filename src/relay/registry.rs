//! Registry of connected real-time subscribers

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::types::LogEntry;

/// Identity of one connection. Never reused, so a reconnecting client
/// always gets a fresh entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receiving half handed to a newly connected client
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub receiver: mpsc::Receiver<LogEntry>,
}

/// Set of live output channels keyed by subscriber id.
///
/// Closing drops every sender, so each receiver yields what is already
/// buffered and then `None`.
#[derive(Debug)]
pub struct SubscriberRegistry {
    inner: Mutex<RegistryState>,
    next_id: AtomicU64,
    buffer: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    subscribers: HashMap<SubscriberId, mpsc::Sender<LogEntry>>,
    closed: bool,
}

impl SubscriberRegistry {
    /// Create a registry whose channels buffer `buffer` entries each
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryState::default()),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    /// Add a connected subscriber. After close the subscription is
    /// already ended.
    pub fn register(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, receiver) = mpsc::channel(self.buffer);
        let mut inner = self.inner.lock();
        if !inner.closed {
            inner.subscribers.insert(id, tx);
        }
        Subscription { id, receiver }
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        self.inner.lock().subscribers.remove(&id).is_some()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.inner.lock().subscribers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().subscribers.is_empty()
    }

    /// Copy of the current members, taken so fan-out runs without the lock
    pub fn snapshot(&self) -> Vec<(SubscriberId, mpsc::Sender<LogEntry>)> {
        self.inner
            .lock()
            .subscribers
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    /// Drop every member and refuse new ones. Returns how many were dropped.
    pub fn close(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.closed = true;
        let dropped = inner.subscribers.len();
        inner.subscribers.clear();
        dropped
    }
}
