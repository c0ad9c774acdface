//! Live push-channel telemetry source (requires the "live" feature).
//!
//! Connects to the backend's websocket channel and routes `data_update`
//! frames to the same [`TelemetryUpdate`] stream the REST poller feeds: two
//! independent ingestion paths, one downstream consumer. The adapter is a
//! router, not a sequencer - it adds no ordering or delivery guarantees on
//! top of the channel itself. Connection lifecycle events drive the
//! dashboard's online/offline badge, and `alert` frames surface as notices.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

use super::{Domain, TelemetrySnapshot, TelemetrySource, TelemetryUpdate};

/// Delay between reconnect attempts after a dropped connection.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// An alert pushed by the backend.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Alert {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A frame received on the push channel.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
enum PushFrame {
    DataUpdate {
        #[serde(rename = "type")]
        tag: String,
        data: TelemetrySnapshot,
    },
    Alert(Alert),
}

/// Lifecycle and alert outputs of the live channel, consumed by the app.
///
/// Also owns the reader task so teardown stays with the app even after the
/// source itself is boxed into the ingestion list.
#[derive(Debug)]
pub struct LiveEvents {
    /// Connection state; flips on connect/disconnect.
    pub connected: watch::Receiver<bool>,
    /// Alert frames, surfaced as auto-dismissing notices.
    pub alerts: mpsc::Receiver<Alert>,
    reader: JoinHandle<()>,
}

impl LiveEvents {
    /// Stop the reader task. Part of app teardown.
    pub fn shutdown(&self) {
        self.reader.abort();
    }
}

/// A telemetry source fed by the backend's websocket push channel.
#[derive(Debug)]
pub struct LiveSource {
    receiver: mpsc::Receiver<TelemetryUpdate>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl LiveSource {
    /// Spawn the reader task. It connects, routes frames, and reconnects on
    /// a fixed delay until aborted.
    pub fn spawn(ws_url: &str) -> (Self, LiveEvents) {
        let url = ws_url.to_string();
        let (update_tx, update_rx) = mpsc::channel(64);
        let (alert_tx, alert_rx) = mpsc::channel(16);
        let (connected_tx, connected_rx) = watch::channel(false);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        let reader = tokio::spawn(async move {
            loop {
                match connect_async(url.as_str()).await {
                    Ok((stream, _)) => {
                        info!(url = %url, "live channel connected");
                        let _ = connected_tx.send(true);
                        *error_handle.lock().unwrap() = None;

                        read_frames(stream, &update_tx, &alert_tx, &error_handle).await;

                        let _ = connected_tx.send(false);
                        info!(url = %url, "live channel disconnected");
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(format!("connect failed: {}", e));
                        warn!(url = %url, "live channel connect failed: {}", e);
                    }
                }

                if update_tx.is_closed() {
                    break;
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        });

        let source = Self {
            receiver: update_rx,
            description: format!("live: {}", ws_url),
            last_error,
        };
        let events = LiveEvents {
            connected: connected_rx,
            alerts: alert_rx,
            reader,
        };
        (source, events)
    }
}

/// Read frames until the connection drops or the consumer goes away.
async fn read_frames<S>(
    mut stream: S,
    updates: &mpsc::Sender<TelemetryUpdate>,
    alerts: &mpsc::Sender<Alert>,
    last_error: &Arc<Mutex<Option<String>>>,
) where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = stream.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            // Pings are answered by the library; other frame types carry
            // nothing for us.
            Ok(_) => continue,
            Err(e) => {
                *last_error.lock().unwrap() = Some(format!("read error: {}", e));
                break;
            }
        };

        match serde_json::from_str::<PushFrame>(&text) {
            Ok(PushFrame::DataUpdate { tag, data }) => {
                let Some(domain) = Domain::from_push_tag(&tag) else {
                    warn!(tag = %tag, "unknown data_update tag");
                    continue;
                };
                if updates.send(TelemetryUpdate::new(domain, data)).await.is_err() {
                    return;
                }
            }
            Ok(PushFrame::Alert(alert)) => {
                // Best-effort: a full buffer drops the alert
                let _ = alerts.try_send(alert);
            }
            Err(e) => {
                warn!("unparseable live frame: {}", e);
            }
        }
    }
}

impl TelemetrySource for LiveSource {
    fn poll(&mut self) -> Option<TelemetryUpdate> {
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(_) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}
