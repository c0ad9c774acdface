//! Field mapping: which snapshot key feeds which display slot.
//!
//! Each telemetry domain declares a set of (slot, source key, unit) mappings.
//! Applying an update walks the domain's set, formats present values into the
//! slot board, and classifies status for the status-bearing domains. Missing
//! keys leave their slots untouched; present-but-falsy values (`0`, `false`,
//! `""`) are applied like any other. This best-effort policy is deliberate:
//! a malformed payload degrades field by field, it never errors.

use std::time::Instant;

use super::slots::{format_value, SlotBoard};
use super::status::classify;
use crate::source::{Domain, TelemetrySnapshot};

/// Number of charge controllers a site carries.
pub const SCC_COUNT: usize = 3;

/// One (slot, source key, unit) mapping.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    pub slot: String,
    pub key: String,
    pub unit: Option<&'static str>,
}

impl FieldMapping {
    fn new(slot: &str, key: &str, unit: Option<&'static str>) -> Self {
        Self {
            slot: slot.to_string(),
            key: key.to_string(),
            unit,
        }
    }
}

/// The static mapping sets for all domains, built once at startup and
/// immutable for the life of the process.
#[derive(Debug)]
pub struct FieldTable {
    device_info: Vec<FieldMapping>,
    lvd: Vec<FieldMapping>,
    scc: Vec<FieldMapping>,
    battery: Vec<FieldMapping>,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTable {
    pub fn new() -> Self {
        let device_info = vec![
            FieldMapping::new("scc-type", "scc_type", None),
            FieldMapping::new("disk-usage", "disk_usage", None),
            FieldMapping::new("datalog-length", "datalog_length", None),
        ];

        let lvd = vec![
            FieldMapping::new("lvd-counter-heartbeat", "counter_heartbeat", None),
            FieldMapping::new("vsat-lvd", "vsat_lvd", None),
            FieldMapping::new("bts-lvd", "bts_lvd", None),
            FieldMapping::new("system-voltage", "system_voltage", Some("V")),
            FieldMapping::new("mcb1", "mcb1_status", None),
            FieldMapping::new("mcb2", "mcb2_status", None),
            FieldMapping::new("mcb3", "mcb3_status", None),
        ];

        // The SCC set fans out across all controllers with index-templated
        // keys: scc{i}_status, pv{i}_voltage, and so on.
        let mut scc = Vec::new();
        for i in 1..=SCC_COUNT {
            scc.push(FieldMapping::new(
                &format!("scc{i}-status"),
                &format!("scc{i}_status"),
                None,
            ));
            scc.push(FieldMapping::new(
                &format!("scc{i}-counter-heartbeat"),
                &format!("scc{i}_counter_heartbeat"),
                None,
            ));
            scc.push(FieldMapping::new(&format!("pv{i}-voltage"), &format!("pv{i}_voltage"), Some("V")));
            scc.push(FieldMapping::new(&format!("pv{i}-current"), &format!("pv{i}_current"), Some("A")));
            scc.push(FieldMapping::new(&format!("pv{i}-power"), &format!("pv{i}_power"), Some("W")));
            scc.push(FieldMapping::new(
                &format!("battery{i}-voltage"),
                &format!("battery{i}_voltage"),
                Some("V"),
            ));
            scc.push(FieldMapping::new(
                &format!("battery{i}-current"),
                &format!("battery{i}_current"),
                Some("A"),
            ));
            scc.push(FieldMapping::new(
                &format!("load{i}-voltage"),
                &format!("load{i}_voltage"),
                Some("V"),
            ));
            scc.push(FieldMapping::new(
                &format!("load{i}-current"),
                &format!("load{i}_current"),
                Some("A"),
            ));
        }

        let battery = vec![
            FieldMapping::new("battery-voltage", "voltage", Some("V")),
            FieldMapping::new("battery-current", "current", Some("A")),
            FieldMapping::new("battery-soc", "soc", Some("%")),
            FieldMapping::new("battery-temperature", "temperature", Some("°C")),
        ];

        Self {
            device_info,
            lvd,
            scc,
            battery,
        }
    }

    /// The mapping set for a domain.
    pub fn mappings(&self, domain: Domain) -> &[FieldMapping] {
        match domain {
            Domain::DeviceInfo => &self.device_info,
            Domain::Lvd => &self.lvd,
            Domain::Scc => &self.scc,
            Domain::Battery => &self.battery,
        }
    }

    /// Every slot id declared by any domain. Used to register the board.
    pub fn slot_ids(&self) -> impl Iterator<Item = &str> {
        self.device_info
            .iter()
            .chain(&self.lvd)
            .chain(&self.scc)
            .chain(&self.battery)
            .map(|m| m.slot.as_str())
    }

    /// Build a slot board with every declared slot registered.
    pub fn build_board(&self) -> SlotBoard {
        let mut board = SlotBoard::new();
        for slot in self.slot_ids() {
            board.register(slot);
        }
        board
    }

    /// Apply one domain snapshot to the board.
    ///
    /// For each mapping: an absent key leaves the slot untouched; a present
    /// value is formatted and pushed, and for status-bearing domains its
    /// classification replaces the slot's status indicator.
    pub fn apply_update(
        &self,
        domain: Domain,
        snapshot: &TelemetrySnapshot,
        board: &mut SlotBoard,
        now: Instant,
    ) {
        for mapping in self.mappings(domain) {
            let Some(value) = snapshot.get(&mapping.key) else {
                continue;
            };

            board.push(&mapping.slot, format_value(value, mapping.unit), now);

            if domain.status_bearing() {
                board.set_status(&mapping.slot, classify(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::status::Status;
    use crate::source::TelemetryValue;
    use std::time::Duration;

    fn snapshot(pairs: &[(&str, TelemetryValue)]) -> TelemetrySnapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_scc_scenario_status_and_formatting() {
        let table = FieldTable::new();
        let mut board = table.build_board();
        let t0 = Instant::now();

        let snap = snapshot(&[
            ("scc1_status", TelemetryValue::Text("fault".into())),
            ("pv1_voltage", TelemetryValue::Number(12.345)),
        ]);
        table.apply_update(Domain::Scc, &snap, &mut board, t0);
        board.flush(t0 + Duration::from_millis(200));

        assert_eq!(board.status("scc1-status"), Some(Status::Danger));
        assert_eq!(board.text("scc1-status"), Some("fault"));
        assert_eq!(board.text("pv1-voltage"), Some("12.35 V"));

        // Absent key: slot untouched
        assert_eq!(board.text("pv2-voltage"), None);
        assert_eq!(board.status("pv2-voltage"), None);
    }

    #[test]
    fn test_falsy_but_present_values_are_applied() {
        let table = FieldTable::new();
        let mut board = table.build_board();
        let t0 = Instant::now();

        let snap = snapshot(&[
            ("soc", TelemetryValue::Number(0.0)),
            ("current", TelemetryValue::Number(0.0)),
        ]);
        table.apply_update(Domain::Battery, &snap, &mut board, t0);
        board.flush(t0 + Duration::from_millis(200));

        assert_eq!(board.text("battery-soc"), Some("0.00 %"));
        assert_eq!(board.text("battery-current"), Some("0.00 A"));
    }

    #[test]
    fn test_lvd_booleans_drive_status() {
        let table = FieldTable::new();
        let mut board = table.build_board();
        let t0 = Instant::now();

        let snap = snapshot(&[
            ("mcb1_status", TelemetryValue::Bool(true)),
            ("mcb2_status", TelemetryValue::Bool(false)),
            ("system_voltage", TelemetryValue::Number(47.9)),
        ]);
        table.apply_update(Domain::Lvd, &snap, &mut board, t0);
        board.flush(t0 + Duration::from_millis(200));

        assert_eq!(board.status("mcb1"), Some(Status::Active));
        assert_eq!(board.status("mcb2"), Some(Status::Inactive));
        // Numeric value in a status-bearing domain clears its indicator
        assert_eq!(board.status("system-voltage"), None);
        assert_eq!(board.text("system-voltage"), Some("47.90 V"));
    }

    #[test]
    fn test_non_status_domains_leave_indicators_alone() {
        let table = FieldTable::new();
        let mut board = table.build_board();
        let t0 = Instant::now();

        let snap = snapshot(&[("voltage", TelemetryValue::Number(48.1))]);
        table.apply_update(Domain::Battery, &snap, &mut board, t0);
        assert_eq!(board.status("battery-voltage"), None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let table = FieldTable::new();
        let mut board = table.build_board();
        let t0 = Instant::now();

        let snap = snapshot(&[("bogus_key", TelemetryValue::Number(1.0))]);
        table.apply_update(Domain::DeviceInfo, &snap, &mut board, t0);
        assert!(!board.has_pending());
    }

    #[test]
    fn test_scc_set_covers_all_controllers() {
        let table = FieldTable::new();
        let mappings = table.mappings(Domain::Scc);
        assert_eq!(mappings.len(), 9 * SCC_COUNT);
        for i in 1..=SCC_COUNT {
            assert!(mappings.iter().any(|m| m.key == format!("scc{i}_status")));
            assert!(mappings.iter().any(|m| m.key == format!("load{i}_current")));
        }
    }
}
