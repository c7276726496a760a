//! Remote change feed client.
//!
//! Listens on the server's change websocket and republishes every change
//! event on the remote-change channel.

use catalog::ChangeEvent;
use futures_util::StreamExt;
use runtime::Channel;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::ClientError;

pub const CHANGES_PATH: &str = "voice-talents/changes";

/// Decodes one text frame. Frames that are not change events are ignored.
pub fn decode_change(text: &str) -> Option<ChangeEvent> {
    match serde_json::from_str(text) {
        Ok(event) => Some(event),
        Err(err) => {
            debug!(error = %err, "ignoring non-change frame");
            None
        }
    }
}

/// `http(s)://host/base` → `ws(s)://host/base/voice-talents/changes`.
pub fn changes_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws}/{CHANGES_PATH}")
}

pub struct RemoteChangeFeed {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RemoteChangeFeed {
    /// Connects, then forwards events on a background task until the socket
    /// closes or the feed is shut down.
    pub async fn connect(url: &str, changes: Channel<ChangeEvent>) -> Result<Self, ClientError> {
        let (mut socket, _) = connect_async(url).await?;
        info!(%url, "change feed connected");
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    frame = socket.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(event) = decode_change(&text) {
                                changes.publish(event);
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("change feed closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            warn!(error = %err, "change feed receive error");
                            break;
                        }
                    }
                }
            }
        });

        Ok(Self {
            stop: Some(stop_tx),
            task: Some(task),
        })
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RemoteChangeFeed {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
