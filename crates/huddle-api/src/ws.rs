//! WebSocket streaming of live board snapshots.
//!
//! One socket equals one observer: connecting attaches a fresh
//! [`BoardFeed`](huddle_board::BoardFeed), the first frame is the current
//! board state, and every remote mutation produces one full-snapshot frame
//! (JSON, `null` while the board does not exist). The feed - and with it the
//! store subscription - is released when the socket closes either way.

use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upgrade handler for `/api/boards/{slug}/ws`.
pub async fn ws_board_handler(
    ws: WebSocketUpgrade,
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_board(socket, slug, state))
}

async fn stream_board(mut socket: WebSocket, slug: String, state: Arc<AppState>) {
    info!(slug = %slug, "board observer connected");

    let mut feed = match state.watcher.watch(&slug).await {
        Ok(feed) => feed,
        Err(err) => {
            warn!(slug = %slug, error = %err, "could not attach board observer");
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    loop {
        tokio::select! {
            delivery = feed.next() => {
                match delivery {
                    Some(Ok(snapshot)) => {
                        let json = match serde_json::to_string(&snapshot) {
                            Ok(json) => json,
                            Err(err) => {
                                warn!(slug = %slug, error = %err, "snapshot encoding failed");
                                break;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        // Terminal for this observer only.
                        warn!(slug = %slug, error = %err, "board feed failed");
                        break;
                    }
                    None => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(slug = %slug, "board observer closed the socket");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        debug!(slug = %slug, error = %err, "socket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!(slug = %slug, "board observer detached");
}
