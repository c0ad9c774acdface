//! Display-side data processing.
//!
//! This module turns raw telemetry snapshots into display state:
//!
//! ```text
//! TelemetryUpdate (domain + raw JSON snapshot)
//!        │
//!        ▼
//! FieldTable::apply_update()
//!        │
//!        ├──▶ SlotBoard (formatted text, staged behind the commit delay)
//!        │
//!        └──▶ classify() (status indicators for LVD/SCC fields)
//! ```
//!
//! ## Submodules
//!
//! - [`fields`]: per-domain (slot, source key, unit) mapping tables
//! - [`slots`]: the slot board - committed text, delayed commits, freshness
//! - [`status`]: keyword/boolean classification into display statuses

pub mod fields;
pub mod slots;
pub mod status;

pub use fields::{FieldMapping, FieldTable, SCC_COUNT};
pub use slots::{format_value, SlotBoard};
pub use status::{classify, Status};
