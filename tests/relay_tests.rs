//! Integration tests for batching and fan-out

use std::sync::Arc;
use std::time::Duration;

use log_relay::relay::{BatchFlusher, LogRelay, RelayConfig, Subscription};
use tokio_util::sync::CancellationToken;

fn relay() -> Arc<LogRelay> {
    Arc::new(LogRelay::new(RelayConfig {
        flush_interval: Duration::from_secs(3),
        subscriber_buffer: 64,
    }))
}

fn received(sub: &mut Subscription) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(entry) = sub.receiver.try_recv() {
        out.push(entry.to_string());
    }
    out
}

#[test]
fn test_one_flush_delivers_whole_window_in_order() {
    let relay = relay();
    let mut s1 = relay.subscribe();
    let mut s2 = relay.subscribe();

    let lines: Vec<String> = (0..50).map(|i| format!(r#"{{"seq":{}}}"#, i)).collect();
    for line in &lines {
        relay.ingest(Some(line.as_bytes()));
    }

    let report = relay.flush();
    assert_eq!(report.entries, 50);
    assert_eq!(report.subscribers, 2);
    assert_eq!(report.delivered, 100);

    assert_eq!(received(&mut s1), lines);
    assert_eq!(received(&mut s2), lines);

    // Nothing left for a second flush
    assert!(relay.flush().is_empty());
    assert!(received(&mut s1).is_empty());
}

#[test]
fn test_empty_window_produces_no_sends() {
    let relay = relay();
    let mut s1 = relay.subscribe();

    relay.ingest(Some(b"log1"));
    relay.flush();
    received(&mut s1);

    let report = relay.flush();
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 0);
    assert!(received(&mut s1).is_empty());
    assert_eq!(relay.stats().flushes, 1);
}

#[test]
fn test_late_subscriber_misses_history() {
    let relay = relay();
    let mut early = relay.subscribe();

    relay.ingest(Some(b"before"));
    relay.flush();

    let mut late = relay.subscribe();
    relay.ingest(Some(b"after"));
    relay.flush();

    assert_eq!(received(&mut early), vec!["before", "after"]);
    assert_eq!(received(&mut late), vec!["after"]);
}

#[test]
fn test_failed_subscriber_does_not_affect_others() {
    let relay = relay();
    let mut a = relay.subscribe();
    let b = relay.subscribe();
    let mut c = relay.subscribe();

    // b goes away without unsubscribing
    drop(b.receiver);

    relay.ingest(Some(b"log1"));
    relay.ingest(Some(b"log2"));
    let report = relay.flush();

    assert_eq!(report.subscribers, 3);
    assert_eq!(report.delivered, 4);
    assert_eq!(report.removed, 1);
    assert_eq!(received(&mut a), vec!["log1", "log2"]);
    assert_eq!(received(&mut c), vec!["log1", "log2"]);
}

#[test]
fn test_unsubscribed_client_is_never_sent_to() {
    let relay = relay();
    let mut stays = relay.subscribe();
    let mut leaves = relay.subscribe();

    relay.ingest(Some(b"log1"));
    relay.flush();
    assert!(relay.unsubscribe(leaves.id));

    relay.ingest(Some(b"log2"));
    let report = relay.flush();

    assert_eq!(report.subscribers, 1);
    assert_eq!(received(&mut stays), vec!["log1", "log2"]);
    assert_eq!(received(&mut leaves), vec!["log1"]);
}

#[test]
fn test_two_subscribers_same_window() {
    let relay = relay();
    let mut s1 = relay.subscribe();
    let mut s2 = relay.subscribe();

    relay.ingest(Some(b"log1"));
    relay.ingest(Some(b"log2"));
    relay.flush();

    assert_eq!(received(&mut s1), vec!["log1", "log2"]);
    assert_eq!(received(&mut s2), vec!["log1", "log2"]);
    assert_eq!(relay.pending_count(), 0);
}

#[test]
fn test_dropped_messages_are_counted_not_queued() {
    let relay = relay();
    let mut s1 = relay.subscribe();

    relay.ingest(None);
    relay.ingest(Some(b"kept"));
    relay.ingest(Some(b""));
    relay.flush();

    assert_eq!(received(&mut s1), vec!["kept"]);
    let stats = relay.stats();
    assert_eq!(stats.ingested, 1);
    assert_eq!(stats.dropped, 2);
}

#[tokio::test(start_paused = true)]
async fn test_flusher_batches_by_interval() {
    let relay = relay();
    let mut sub = relay.subscribe();
    let shutdown = CancellationToken::new();
    let handle = BatchFlusher::new(Arc::clone(&relay)).spawn(shutdown.clone());
    tokio::task::yield_now().await;

    relay.ingest(Some(b"first window"));
    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(received(&mut sub), vec!["first window"]);

    relay.ingest(Some(b"second window a"));
    relay.ingest(Some(b"second window b"));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(received(&mut sub).is_empty());

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(
        received(&mut sub),
        vec!["second window a", "second window b"]
    );

    shutdown.cancel();
    handle.await.unwrap();
    assert_eq!(relay.stats().flushes, 2);
}
