//! WebSocket push channel for live observers
//!
//! On connect the socket is registered in the subscriber hub; incoming
//! frames are read and discarded (they only signal liveness), and
//! pre-serialized notification payloads are forwarded verbatim. Disconnect,
//! a transport error, or a failed forward all end in the same idempotent
//! deregistration.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use crate::http::AppState;
use roadsense_core::service::SubscriberHub;

/// WebSocket handler for real-time record notifications
pub async fn websocket_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub.clone()))
}

async fn handle_socket(socket: WebSocket, hub: Arc<SubscriberHub>) {
    let (connection_id, mut rx) = hub.subscribe();
    info!(connection_id = %connection_id, "WebSocket observer connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Forward task: notification payloads -> socket. A send failure ends
    // the task; dropping the receiver makes later dispatch attempts fail,
    // which removes this connection from the hub.
    let forward_id = connection_id.clone();
    let mut forward = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if let Err(e) = ws_sender
                .send(Message::Text(payload.to_string().into()))
                .await
            {
                debug!(
                    connection_id = %forward_id,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                break;
            }
        }
    });

    // Read loop: payloads are discarded, the socket is only read to detect
    // closure or transport errors.
    loop {
        tokio::select! {
            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "WebSocket read error"
                    );
                    break;
                }
            },
            _ = &mut forward => break,
        }
    }

    forward.abort();
    hub.unsubscribe(&connection_id);
    info!(connection_id = %connection_id, "WebSocket observer disconnected");
}
