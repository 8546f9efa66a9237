//! Tracing subscriber setup

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::{RelayError, RelayResult};

/// Install the global fmt subscriber writing to stdout.
///
/// `level` is any `EnvFilter` directive. Chatty dependency targets are
/// capped at `warn` unless the directive names them explicitly. Records
/// written through the `log` crate (rdkafka's client errors among them) are
/// bridged into the same subscriber.
pub fn init(level: &str) -> RelayResult<()> {
    init_with_writer(level, std::io::stdout)
}

/// Same as [`init`] with a custom writer
pub fn init_with_writer<W>(level: &str, writer: W) -> RelayResult<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(filter_directive(level))
        .map_err(|e| RelayError::Config(format!("invalid log level {:?}: {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| RelayError::Config(format!("failed to install log subscriber: {}", e)))
}

// Later directives for the same target replace earlier ones, so the user's
// directive goes last.
fn filter_directive(level: &str) -> String {
    format!("hyper=warn,tower_http=warn,rdkafka=warn,{}", level.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(level: &str, emit: impl FnOnce()) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_new(filter_directive(level)).unwrap())
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = capture.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_directive_kept_verbatim() {
        let directive = filter_directive(" info,[req{path=/Api}]=debug ");
        assert!(directive.ends_with(",info,[req{path=/Api}]=debug"));
        assert!(EnvFilter::try_new(directive).is_ok());
    }

    #[test]
    fn test_dependencies_capped_by_default() {
        let out = captured("info", || {
            tracing::info!(target: "hyper::proto", "hyper chatter");
            tracing::warn!(target: "hyper::proto", "hyper warning");
            tracing::info!(target: "log_relay::relay", "relay info");
        });
        assert!(!out.contains("hyper chatter"));
        assert!(out.contains("hyper warning"));
        assert!(out.contains("relay info"));
    }

    #[test]
    fn test_naming_a_dependency_lifts_its_cap() {
        let out = captured("info,hyper=debug", || {
            tracing::debug!(target: "hyper::proto", "hyper detail");
            tracing::debug!(target: "tower_http::trace", "tower detail");
        });
        assert!(out.contains("hyper detail"));
        assert!(!out.contains("tower detail"));
    }

    #[test]
    fn test_bad_level_rejected() {
        assert!(EnvFilter::try_new(filter_directive("log_relay=loud")).is_err());
    }
}
