/// Snapshot stream over WebSocket
///
/// A socket receives the room's current snapshot as soon as it connects and
/// every change after that, as JSON text frames. Inbound frames other than
/// close are ignored; commands go through the REST routes.
use crate::{api::rooms::room_handle, error::Result, state::AppState};
use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use soundroom_core::{ObserverId, PlaybackSnapshot};
use soundroom_session::SessionHandle;
use soundroom_sync::{DeliveryError, SnapshotObserver};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Frames buffered between the distributor and the socket writer
const OUTBOUND_BUFFER: usize = 16;

/// Distributor-facing end of one socket
struct SocketObserver {
    id: ObserverId,
    outbound: mpsc::Sender<String>,
}

#[async_trait]
impl SnapshotObserver for SocketObserver {
    fn id(&self) -> ObserverId {
        self.id
    }

    async fn deliver(&self, snapshot: &PlaybackSnapshot) -> std::result::Result<(), DeliveryError> {
        let text = serde_json::to_string(snapshot)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        self.outbound
            .send(text)
            .await
            .map_err(|_| DeliveryError::Disconnected)
    }

    fn on_slow_connection(&self, slow: bool) {
        tracing::debug!(observer = %self.id, slow, "socket delivery degraded");
    }
}

/// GET /api/rooms/:room/ws - Subscribe to room snapshots
pub async fn subscribe(
    State(app_state): State<AppState>,
    Path(room): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response> {
    let handle = room_handle(&app_state, &room).await?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, handle)))
}

async fn handle_socket(socket: WebSocket, handle: SessionHandle) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound, mut frames) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    let observer = Arc::new(SocketObserver {
        id: ObserverId::generate(),
        outbound,
    });
    let observer_id = observer.id;
    let registration = handle.connect(observer);
    tracing::info!(room = %handle.room(), observer = %observer_id, "socket subscribed");

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(text) = frame else { break };
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    registration.disconnect();
    tracing::info!(room = %handle.room(), observer = %observer_id, "socket closed");
}
