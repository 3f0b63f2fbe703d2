//! WebSocket connection handlers.
//!
//! Each connection runs one reader loop (this task) and one writer task
//! (`pusher_loop`) that drains the bounded outbound queue. Whichever side
//! ends first ends the session, and disconnect cleanup runs exactly once.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::ui::{event_router::ConnectionSession, state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the outbound queue into the WebSocket sink.
///
/// The task ends when the queue's sender is dropped (the connection was
/// unregistered from the pusher, e.g. on overflow) or the sink fails.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::channel(state.outbound_buffer);
    let connection_id = state.connect_client_usecase.execute(tx).await;

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut session = ConnectionSession::new(connection_id);

    loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    state.event_router.route_text(&mut session, text.as_str()).await;
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Connection '{}' closed by peer", connection_id);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => {
                tracing::warn!("Outbound queue of '{}' closed, dropping connection", connection_id);
                break;
            }
        }
    }
    send_task.abort();

    if let Err(e) = state
        .disconnect_client_usecase
        .execute(connection_id, session.into_joined())
        .await
    {
        tracing::error!("Disconnect cleanup for '{}' failed: {}", connection_id, e);
    }
}
