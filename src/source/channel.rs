//! Channel-based telemetry source.
//!
//! Receives updates via a tokio mpsc channel. This is useful for embedding
//! the dashboard behind a custom producer, and for tests that need to push
//! updates without a network.

use tokio::sync::mpsc;

use super::{TelemetrySource, TelemetryUpdate};

/// A telemetry source fed by an in-process channel.
///
/// The producer sends [`TelemetryUpdate`]s through the channel and the
/// dashboard drains them like any other source.
///
/// # Example
///
/// ```
/// use powerdesk::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<TelemetryUpdate>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a channel.
    pub fn new(receiver: mpsc::Receiver<TelemetryUpdate>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            disconnected: false,
        }
    }

    /// Create a channel pair for pushing updates into a `ChannelSource`.
    ///
    /// Returns `(sender, source)` where the sender pushes updates and the
    /// source plugs into the dashboard.
    pub fn create(source_description: &str) -> (mpsc::Sender<TelemetryUpdate>, Self) {
        let (tx, rx) = mpsc::channel(64);
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl TelemetrySource for ChannelSource {
    fn poll(&mut self) -> Option<TelemetryUpdate> {
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.disconnected = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.disconnected.then(|| "producer disconnected".to_string())
    }
}
