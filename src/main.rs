//! Log Relay - Binary Entry Point
//!
//! Starts the batch flusher, the Kafka consumer and the HTTP/WebSocket
//! server. On Ctrl-C, SIGTERM or a fatal consumer error the ingest paths
//! stop first, then the relay's final flush runs, then subscribers drain.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use log_relay::api::{create_router, AppState};
use log_relay::relay::{BatchFlusher, LogRelay};
use log_relay::{Config, RelayError, RelayResult};

type ConsumerHandle = JoinHandle<RelayResult<()>>;

const SUBSCRIBER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(e) = log_relay::logging::init(&config.log_level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Log relay terminated: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> RelayResult<()> {
    config.validate()?;

    let relay = Arc::new(LogRelay::new(config.relay_config()));

    // Ingest paths stop first; the flusher only closes the relay after they
    // have drained, so its final flush is really the last one.
    let shutdown = CancellationToken::new();
    let flush_shutdown = CancellationToken::new();

    let flusher = BatchFlusher::new(Arc::clone(&relay)).spawn(flush_shutdown.clone());
    let consumer = spawn_consumer(&config, &relay, &shutdown)?;

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: config.listen_addr.clone(),
            source,
        })?;
    info!(
        addr = %config.listen_addr,
        flush_interval_ms = config.flush_interval_ms,
        "Log relay listening"
    );

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let state = Arc::new(AppState::new(Arc::clone(&relay)));
    let app = create_router(Arc::clone(&state));
    let server_token = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_token.cancelled().await })
        .await;

    // Server errors stop the consumer too
    shutdown.cancel();

    let consumed = match consumer {
        Some(handle) => handle
            .await
            .map_err(|e| RelayError::Consumer(format!("consumer task failed: {}", e)))
            .and_then(|result| result),
        None => Ok(()),
    };

    flush_shutdown.cancel();
    if let Err(e) = flusher.await {
        warn!("Batch flusher task failed: {}", e);
    }

    // Sockets drain what the final flush handed them, then close
    state.connections.close();
    if timeout(SUBSCRIBER_DRAIN_TIMEOUT, state.connections.wait())
        .await
        .is_err()
    {
        warn!(
            connections = state.connections.len(),
            "Subscribers still draining at exit"
        );
    }

    served?;
    consumed
}

#[cfg(feature = "kafka")]
fn spawn_consumer(
    config: &Config,
    relay: &Arc<LogRelay>,
    shutdown: &CancellationToken,
) -> RelayResult<Option<ConsumerHandle>> {
    use log_relay::ingest::LogConsumer;

    if config.no_kafka {
        info!("Kafka consumer disabled, accepting HTTP ingest only");
        return Ok(None);
    }

    let consumer = LogConsumer::connect(config.consumer_settings())?;
    let relay = Arc::clone(relay);
    let token = shutdown.clone();

    Ok(Some(tokio::spawn(async move {
        let result = consumer.run(relay, token.clone()).await;
        if result.is_err() {
            // Bring the server down with the consumer
            token.cancel();
        }
        result
    })))
}

#[cfg(not(feature = "kafka"))]
fn spawn_consumer(
    _config: &Config,
    _relay: &Arc<LogRelay>,
    _shutdown: &CancellationToken,
) -> RelayResult<Option<ConsumerHandle>> {
    warn!("Built without the `kafka` feature, accepting HTTP ingest only");
    Ok(None)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
