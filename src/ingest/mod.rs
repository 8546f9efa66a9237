//! Inbound log stream
//!
//! Log lines arrive on a Kafka topic (default `logs`, group
//! `log-events-group`) and are handed to [`LogRelay::ingest`] one message at
//! a time. Consumption starts from the latest offset; history published
//! before the relay joined the group is not replayed.
//!
//! [`LogRelay::ingest`]: crate::relay::LogRelay::ingest

#[cfg(feature = "kafka")]
pub mod kafka;

#[cfg(feature = "kafka")]
pub use kafka::LogConsumer;

/// Connection settings for the inbound stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerSettings {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            topic: "logs".to_string(),
            group_id: "log-events-group".to_string(),
        }
    }
}
