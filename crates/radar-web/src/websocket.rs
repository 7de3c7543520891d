//! WebSocket handler for live state updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Push the current state on connect and after every change.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.controller.subscribe();

    info!("WebSocket client connected");

    let mut send_task = tokio::spawn(async move {
        loop {
            let json = {
                let snapshot = rx.borrow_and_update();
                serde_json::to_string(&*snapshot)
            };

            match json {
                Ok(json) => {
                    debug!(len = json.len(), "Sending state to WebSocket client");
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to serialize search state");
                    break;
                }
            }

            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                debug!("WebSocket client sent close frame");
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("WebSocket client disconnected");
}
