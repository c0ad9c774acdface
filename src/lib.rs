// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # powerdesk
//!
//! A terminal dashboard and library for monitoring JSPro solar power
//! installations.
//!
//! This crate renders live telemetry from a PowerDesk backend: device
//! information, the low-voltage-disconnect unit, the solar charge
//! controllers, and the battery bank. Data arrives by polling the backend's
//! REST endpoints and, optionally, over its websocket push channel; both
//! paths feed the same display pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │ │
//! │  │ (state) │    │ (mapping)│    │(render) │    │          │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── RestSource | LiveSource | ChannelSource     │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, notices, login gate
//! - **[`source`]**: Ingestion abstraction ([`TelemetrySource`] trait) with
//!   REST polling, live push-channel, and in-process channel implementations
//! - **[`data`]**: The display pipeline - field mapping tables, value
//!   formatting with delayed commits ([`SlotBoard`]), status classification
//! - **[`ui`]**: Terminal rendering using ratatui - per-view panels, shared
//!   chrome, and theme support
//! - **[`settings`]**: Layered configuration (file, environment, CLI)
//! - **[`login`]**: Login form model with client-side validation
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a backend every 5 seconds
//! powerdesk --server http://10.0.0.12:5000
//!
//! # Also consume the live push channel
//! powerdesk --server http://10.0.0.12:5000 --live ws://10.0.0.12:5000/stream
//! ```
//!
//! ### As a library with an in-process source
//!
//! ```
//! use powerdesk::{App, ChannelSource, Preferences, Settings};
//!
//! let settings = Settings::default();
//! let (tx, source) = ChannelSource::create("embedded");
//! let mut app = App::new(&settings, Preferences::open("preferences.json"));
//! app.attach_source(Box::new(source));
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod login;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, ConnectionBadge, View};
pub use data::{classify, format_value, FieldTable, SlotBoard, Status};
pub use settings::Settings;
pub use source::{
    ChannelSource, Domain, PollerHandle, RestSource, TelemetrySnapshot, TelemetrySource,
    TelemetryUpdate, TelemetryValue,
};
pub use ui::{Preferences, Theme, ThemeKind};

#[cfg(feature = "live")]
pub use source::{Alert, LiveEvents, LiveSource};
