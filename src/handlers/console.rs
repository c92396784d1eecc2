//! `/consoleHub` WebSocket
//!
//! Streams captured log entries as JSON text frames until the client goes
//! away or the server shuts down.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Extension;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::hubs::{LogEntry, LogLevel};
use crate::middleware::ShutdownToken;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConsoleQuery {
    /// Minimum level streamed to this client
    pub level: Option<String>,
}

pub async fn connect(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<ConsoleQuery>,
    Extension(ShutdownToken(shutdown)): Extension<ShutdownToken>,
) -> Response {
    let min_level = query
        .level
        .as_deref()
        .map(LogLevel::parse_or_info)
        .unwrap_or(LogLevel::Info);
    let receiver = state.console.subscribe();

    ws.on_upgrade(move |socket| stream_logs(socket, receiver, min_level, shutdown))
}

async fn stream_logs(
    socket: WebSocket,
    mut receiver: broadcast::Receiver<LogEntry>,
    min_level: LogLevel,
    shutdown: CancellationToken,
) {
    let (mut sink, mut stream) = socket.split();
    info!("Console client connected");

    let mut read_task = tokio::spawn(async move {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Close(_)) | Err(_) => break,
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            result = receiver.recv() => match result {
                Ok(entry) if entry.level.at_least(min_level) => {
                    let json = match serde_json::to_string(&entry) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!(error = %e, "Failed to serialize log entry");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                // Slow clients skip entries
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped = skipped, "Console client lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = &mut read_task => break,
            _ = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }

    read_task.abort();
    info!("Console client disconnected");
}
