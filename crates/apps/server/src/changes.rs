//! Talent change notifications pushed to websocket subscribers.

use axum::extract::ws::{Message, WebSocket};
use catalog::ChangeEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const HUB_CAPACITY: usize = 256;

/// Fan-out of catalog changes to every connected socket.
#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    /// Returns how many sockets will see the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        debug!(table = %event.table, kind = ?event.kind, "publishing change");
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards hub events as JSON text frames until either side goes away.
pub async fn serve_socket(socket: WebSocket, mut events: broadcast::Receiver<ChangeEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    info!("change subscriber connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(t) => t,
                        Err(e) => {
                            warn!("Failed to serialize change: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = ws_tx.send(Message::Text(text)).await {
                        debug!("change subscriber gone: {e}");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Consumers refetch in full, so dropped events only cost latency.
                    warn!(skipped, "change subscriber lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WS receive error: {e}");
                    break;
                }
            },
        }
    }
    info!("change subscriber disconnected");
}
