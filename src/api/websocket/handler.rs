//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use super::state::AppState;
use crate::relay::Subscription;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let connections = state.connections.clone();
    ws.on_upgrade(move |socket| connections.track_future(handle_socket(socket, state)))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let Subscription { id, mut receiver } = state.relay.subscribe();
    info!(
        subscriber = %id,
        subscribers = state.relay.subscriber_count(),
        "Subscriber connected"
    );

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            // Flushed log lines to client
            entry = receiver.recv() => {
                match entry {
                    Some(entry) => {
                        if sink.send(Message::Text(entry.as_str().to_owned())).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    None => {
                        // Relay closed after its final flush
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            // Client frames only matter for detecting disconnects
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(subscriber = %id, "WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    state.relay.unsubscribe(id);
    info!(
        subscriber = %id,
        subscribers = state.relay.subscriber_count(),
        "Subscriber disconnected"
    );
}
