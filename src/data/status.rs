//! Status classification for telemetry values.
//!
//! Maps raw values (relay booleans, status text) to one of four display
//! categories by keyword matching.

use crate::source::TelemetryValue;

/// Display status for a telemetry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Inactive,
    Active,
    Warning,
    Danger,
}

impl Status {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Active => "OK",
            Status::Inactive => "OFF",
            Status::Warning => "WARN",
            Status::Danger => "ALARM",
        }
    }
}

/// Classify a raw telemetry value into a display status.
///
/// Booleans map directly (`true` → active, `false` → inactive). Strings are
/// matched case-insensitively against keyword sets, first match wins:
/// alarm/error/fault → danger, warning → warning, active/on/normal → active,
/// anything else → inactive. Numbers carry no status; the caller clears any
/// existing indicator when `None` is returned.
pub fn classify(value: &TelemetryValue) -> Option<Status> {
    match value {
        TelemetryValue::Bool(true) => Some(Status::Active),
        TelemetryValue::Bool(false) => Some(Status::Inactive),
        TelemetryValue::Text(s) => {
            let lower = s.to_lowercase();
            let status = if lower.contains("alarm") || lower.contains("error") || lower.contains("fault") {
                Status::Danger
            } else if lower.contains("warning") {
                Status::Warning
            } else if lower.contains("active") || lower.contains("on") || lower.contains("normal") {
                Status::Active
            } else {
                Status::Inactive
            };
            Some(status)
        }
        TelemetryValue::Number(_) => None,
    }
}
