//! Kafka consumer feeding the relay

use std::sync::Arc;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::ConsumerSettings;
use crate::error::{RelayError, RelayResult};
use crate::relay::LogRelay;

/// Stream consumer subscribed to the log topic
pub struct LogConsumer {
    consumer: StreamConsumer,
    settings: ConsumerSettings,
}

impl LogConsumer {
    /// Create the client and subscribe to the configured topic
    pub fn connect(settings: ConsumerSettings) -> RelayResult<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &settings.brokers)
            .set("group.id", &settings.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .create()?;

        consumer.subscribe(&[settings.topic.as_str()])?;

        info!(
            brokers = %settings.brokers,
            topic = %settings.topic,
            group = %settings.group_id,
            "Subscribed to log topic"
        );

        Ok(Self { consumer, settings })
    }

    /// Feed every message into the relay until cancelled.
    ///
    /// Any receive error is returned as fatal.
    pub async fn run(self, relay: Arc<LogRelay>, shutdown: CancellationToken) -> RelayResult<()> {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(topic = %self.settings.topic, "Log consumer stopped");
                    return Ok(());
                }

                message = self.consumer.recv() => {
                    match message {
                        Ok(message) => {
                            relay.ingest(message.payload());
                        }
                        Err(e) => {
                            error!(topic = %self.settings.topic, "Log consumer error: {}", e);
                            return Err(RelayError::Consumer(e.to_string()));
                        }
                    }
                }
            }
        }
    }
}
