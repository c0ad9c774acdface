//! Shared types for telemetry snapshots.
//!
//! These types match the JSON payloads served by the PowerDesk backend's
//! realtime endpoints and pushed over its live channel. They are the common
//! data format between every ingestion path and the field mapper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single snapshot of one telemetry domain.
///
/// This is one endpoint's JSON payload for a single poll tick: a flat object
/// mapping field keys (e.g. `"pv1_voltage"`) to values. Snapshots are created
/// on receipt, consumed synchronously, and discarded; no history is kept.
pub type TelemetrySnapshot = BTreeMap<String, TelemetryValue>;

/// A raw telemetry value as it appears on the wire.
///
/// The backend mixes booleans (relay states), numbers (measurements) and
/// strings (status text) freely within one payload, so the value type is an
/// untagged union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl TelemetryValue {
    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TelemetryValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A telemetry domain: one category of device data with its own endpoint,
/// push tag and field-mapping set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Domain {
    /// Static device information (controller type, disk usage, datalog size).
    DeviceInfo,
    /// Low-voltage-disconnect unit state.
    Lvd,
    /// Solar charge controllers (three units per site).
    Scc,
    /// Battery bank measurements.
    Battery,
}

impl Domain {
    /// All domains, in the order they are polled.
    pub const ALL: [Domain; 4] = [Domain::DeviceInfo, Domain::Lvd, Domain::Scc, Domain::Battery];

    /// The REST endpoint path serving this domain.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Domain::DeviceInfo => "/api/device-information",
            Domain::Lvd => "/api/lvd-realtime",
            Domain::Scc => "/api/scc-realtime",
            Domain::Battery => "/api/battery-realtime",
        }
    }

    /// Resolve a live-channel `data_update` tag to a domain.
    ///
    /// Returns `None` for tags this dashboard does not display.
    pub fn from_push_tag(tag: &str) -> Option<Self> {
        match tag {
            "device_info" => Some(Domain::DeviceInfo),
            "lvd_data" => Some(Domain::Lvd),
            "scc_data" => Some(Domain::Scc),
            "battery_data" => Some(Domain::Battery),
            _ => None,
        }
    }

    /// Whether values in this domain carry a status classification.
    ///
    /// LVD and SCC fields drive status indicators (relay states, alarm text);
    /// device info and battery measurements are plain values.
    pub fn status_bearing(&self) -> bool {
        matches!(self, Domain::Lvd | Domain::Scc)
    }

    /// Returns the display label for this domain.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::DeviceInfo => "Device",
            Domain::Lvd => "LVD",
            Domain::Scc => "Chargers",
            Domain::Battery => "Battery",
        }
    }
}

/// One routed unit of telemetry: a snapshot tagged with its domain.
///
/// Every ingestion path (REST poller, live channel, in-process channel)
/// produces these; the field mapper consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryUpdate {
    pub domain: Domain,
    pub snapshot: TelemetrySnapshot,
}

impl TelemetryUpdate {
    pub fn new(domain: Domain, snapshot: TelemetrySnapshot) -> Self {
        Self { domain, snapshot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_snapshot() {
        let json = r#"{
            "scc1_status": "Normal",
            "pv1_voltage": 48.72,
            "mcb1_status": true,
            "counter_heartbeat": 1042
        }"#;

        let snapshot: TelemetrySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(
            snapshot.get("scc1_status"),
            Some(&TelemetryValue::Text("Normal".to_string()))
        );
        assert_eq!(snapshot.get("pv1_voltage"), Some(&TelemetryValue::Number(48.72)));
        assert_eq!(snapshot.get("mcb1_status"), Some(&TelemetryValue::Bool(true)));
        assert_eq!(
            snapshot.get("counter_heartbeat"),
            Some(&TelemetryValue::Number(1042.0))
        );
    }

    #[test]
    fn test_falsy_values_survive_deserialization() {
        // Zero and empty string are real values, not absences
        let json = r#"{"soc": 0, "scc_type": ""}"#;
        let snapshot: TelemetrySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.get("soc"), Some(&TelemetryValue::Number(0.0)));
        assert_eq!(snapshot.get("scc_type"), Some(&TelemetryValue::Text(String::new())));
    }

    #[test]
    fn test_push_tag_round_trip() {
        assert_eq!(Domain::from_push_tag("device_info"), Some(Domain::DeviceInfo));
        assert_eq!(Domain::from_push_tag("lvd_data"), Some(Domain::Lvd));
        assert_eq!(Domain::from_push_tag("scc_data"), Some(Domain::Scc));
        assert_eq!(Domain::from_push_tag("battery_data"), Some(Domain::Battery));
        assert_eq!(Domain::from_push_tag("unknown"), None);
    }

    #[test]
    fn test_status_bearing_domains() {
        assert!(Domain::Lvd.status_bearing());
        assert!(Domain::Scc.status_bearing());
        assert!(!Domain::DeviceInfo.status_bearing());
        assert!(!Domain::Battery.status_bearing());
    }
}
