//! Telemetry ingestion abstraction.
//!
//! This module provides a trait-based abstraction for receiving telemetry
//! updates from various paths (REST polling, the live push channel, or
//! in-process channels) and the shared wire types they produce.

mod channel;
mod rest;
mod snapshot;

#[cfg(feature = "live")]
mod live;

pub use channel::ChannelSource;
pub use rest::{PollerHandle, RestSource};
pub use snapshot::{Domain, TelemetrySnapshot, TelemetryUpdate, TelemetryValue};

#[cfg(feature = "live")]
pub use live::{Alert, LiveEvents, LiveSource};

use std::fmt::Debug;

/// Trait for receiving telemetry updates from various ingestion paths.
///
/// Implementations forward updates from different backends - the REST poller,
/// the live push channel, or an in-process channel for embedding and tests.
/// All paths feed the same downstream consumer (the field mapper).
///
/// # Example
///
/// ```
/// use powerdesk::{ChannelSource, TelemetrySource};
///
/// let (tx, mut source) = ChannelSource::create("embedded");
/// if let Some(update) = source.poll() {
///     println!("got {:?}", update.domain);
/// }
/// ```
pub trait TelemetrySource: Send + Debug {
    /// Poll for the next pending update.
    ///
    /// Returns `Some(update)` if one is available, `None` otherwise.
    /// This method must be non-blocking; the TUI loop drains each source
    /// every frame.
    fn poll(&mut self) -> Option<TelemetryUpdate>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the status bar.
    fn description(&self) -> &str;

    /// The most recent error observed by the source, if any.
    ///
    /// Errors here are informational; a failing source simply stops
    /// contributing updates.
    fn error(&self) -> Option<String>;
}
