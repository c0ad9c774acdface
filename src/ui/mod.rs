//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the
//! dashboard. Each view is implemented in its own submodule with a `render`
//! function.
//!
//! ## Submodules
//!
//! - [`overview`]: Device information and the low-voltage-disconnect unit
//! - [`chargers`]: The three solar charge controllers, side by side
//! - [`battery`]: Battery bank measurements
//! - [`login`]: The login form shown before the dashboard when required
//! - [`common`]: Shared components (header, sidebar, status bar, notices, help)
//! - [`theme`]: Light/dark theme support with a persisted preference
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current
//! view:
//!
//! ```text
//! ┌───────────┬──────────────────────────┐
//! │           │ Header (common)          │
//! │  Sidebar  ├──────────────────────────┤
//! │  (common) │ View Content             │
//! │           │ (overview/chargers/      │
//! │           │  battery::render)        │
//! │           ├──────────────────────────┤
//! │           │ Status Bar (common)      │
//! └───────────┴──────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - common::render_notices
//!    - common::render_help
//! ```

pub mod battery;
pub mod chargers;
pub mod common;
pub mod login;
pub mod overview;
pub mod theme;

pub use theme::{Preferences, Theme, ThemeKind};
