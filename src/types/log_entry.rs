//! Log entry payloads

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A single log line as received from a producer.
///
/// The payload is opaque to the relay. It is usually a JSON object with
/// `level`, `message`, `timestamp` and `source`, but nothing here parses it.
/// Cloning shares the underlying string, so fanning one entry out to many
/// subscribers does not copy it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LogEntry(Arc<str>);

impl LogEntry {
    /// Decode a raw message payload.
    ///
    /// Returns `None` for a missing or zero-length payload. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn from_payload(payload: Option<&[u8]>) -> Option<Self> {
        match payload {
            Some(bytes) if !bytes.is_empty() => {
                Some(Self(Arc::from(String::from_utf8_lossy(bytes))))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogEntry {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for LogEntry {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for LogEntry {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
