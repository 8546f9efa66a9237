//! Error types for the log relay

use thiserror::Error;

/// Errors that terminate the relay or one of its entry points
#[derive(Debug, Error)]
pub enum RelayError {
    /// Invalid startup configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The inbound stream consumer failed; restart is left to the supervisor
    #[error("log consumer failed: {0}")]
    Consumer(String),

    /// Could not bind the HTTP listener
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(feature = "kafka")]
impl From<rdkafka::error::KafkaError> for RelayError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        RelayError::Consumer(err.to_string())
    }
}
