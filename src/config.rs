//! Command line and environment configuration

use std::time::Duration;

use clap::Parser;

use crate::error::{RelayError, RelayResult};
use crate::ingest::ConsumerSettings;
use crate::relay::RelayConfig;

/// Default interval between batch flushes
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 3000;

/// Default per-subscriber channel capacity
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 1024;

/// Log relay settings, read from flags with environment fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "log-relay", version, about)]
pub struct Config {
    /// Address the HTTP/WebSocket server listens on
    #[arg(long, env = "RELAY_LISTEN_ADDR", default_value = "0.0.0.0:6008")]
    pub listen_addr: String,

    /// Comma separated Kafka bootstrap servers
    #[arg(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
    pub kafka_brokers: String,

    /// Topic carrying log lines
    #[arg(long, env = "KAFKA_TOPIC", default_value = "logs")]
    pub kafka_topic: String,

    /// Consumer group id
    #[arg(long, env = "KAFKA_GROUP_ID", default_value = "log-events-group")]
    pub kafka_group: String,

    /// Milliseconds between flushes
    #[arg(long, env = "RELAY_FLUSH_INTERVAL_MS", default_value_t = DEFAULT_FLUSH_INTERVAL_MS)]
    pub flush_interval_ms: u64,

    /// Entries buffered per subscriber before new ones are dropped
    #[arg(long, env = "RELAY_SUBSCRIBER_BUFFER", default_value_t = DEFAULT_SUBSCRIBER_BUFFER)]
    pub subscriber_buffer: usize,

    /// Log filter, e.g. `info` or `log_relay=debug`
    #[arg(long, env = "RELAY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Serve HTTP ingest only, without a Kafka consumer
    #[arg(long, env = "RELAY_NO_KAFKA")]
    pub no_kafka: bool,
}

impl Config {
    /// Reject settings the relay cannot run with
    pub fn validate(&self) -> RelayResult<()> {
        if self.flush_interval_ms == 0 {
            return Err(RelayError::Config(
                "flush interval must be greater than zero".to_string(),
            ));
        }
        if self.subscriber_buffer == 0 {
            return Err(RelayError::Config(
                "subscriber buffer must be greater than zero".to_string(),
            ));
        }
        if !self.no_kafka {
            if self.kafka_brokers.trim().is_empty() {
                return Err(RelayError::Config("kafka brokers must be set".to_string()));
            }
            if self.kafka_topic.trim().is_empty() {
                return Err(RelayError::Config("kafka topic must be set".to_string()));
            }
            if self.kafka_group.trim().is_empty() {
                return Err(RelayError::Config("kafka group must be set".to_string()));
            }
        }
        Ok(())
    }

    /// Settings for the relay core
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            flush_interval: Duration::from_millis(self.flush_interval_ms),
            subscriber_buffer: self.subscriber_buffer,
        }
    }

    /// Settings for the inbound Kafka consumer
    pub fn consumer_settings(&self) -> ConsumerSettings {
        ConsumerSettings {
            brokers: self.kafka_brokers.clone(),
            topic: self.kafka_topic.clone(),
            group_id: self.kafka_group.clone(),
        }
    }
}
