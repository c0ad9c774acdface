//! The slot board: display state for every output location.
//!
//! A slot is a named output location showing one formatted value. The board
//! keeps the committed text per slot (so repeated identical updates are
//! no-ops), stages changed values behind a short commit delay (the visual
//! transition of the original dashboard: the text must only change after the
//! delay), and tracks a freshness window used to highlight just-committed
//! values. All methods take the current `Instant` explicitly so behavior is
//! testable without sleeping.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::status::Status;
use crate::source::TelemetryValue;

/// Delay between receiving a changed value and committing it to the display.
const COMMIT_DELAY: Duration = Duration::from_millis(150);

/// How long a slot stays highlighted after a commit.
const FRESH_WINDOW: Duration = Duration::from_millis(300);

/// Format a telemetry value for display.
///
/// Numbers are fixed to two decimals and suffixed with a space and the unit
/// when one is given; booleans and text pass through unformatted.
pub fn format_value(value: &TelemetryValue, unit: Option<&str>) -> String {
    match value {
        TelemetryValue::Number(n) => match unit {
            Some(u) => format!("{:.2} {}", n, u),
            None => format!("{:.2}", n),
        },
        TelemetryValue::Bool(b) => b.to_string(),
        TelemetryValue::Text(s) => s.clone(),
    }
}

/// A staged write waiting for its commit instant.
#[derive(Debug, Clone)]
struct Staged {
    text: String,
    due: Instant,
}

/// Display state for one slot.
#[derive(Debug, Clone, Default)]
struct Slot {
    text: String,
    staged: Option<Staged>,
    status: Option<Status>,
    fresh_until: Option<Instant>,
}

/// The board of all display slots.
///
/// Slots are registered once at startup (from the field-mapping tables);
/// writes to unregistered slots are silently dropped, mirroring the original
/// dashboard's missing-element behavior.
#[derive(Debug, Default)]
pub struct SlotBoard {
    slots: HashMap<String, Slot>,
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot id. Registering twice is harmless.
    pub fn register(&mut self, slot: &str) {
        self.slots.entry(slot.to_string()).or_default();
    }

    /// Stage a value for a slot.
    ///
    /// If `text` equals the committed text this is a no-op; any staged write
    /// is cancelled as superseded, since the display already shows the latest
    /// value. Otherwise the write is staged to commit after the delay,
    /// replacing any earlier staged write (last writer wins). Unknown slots
    /// are silently skipped.
    pub fn push(&mut self, slot: &str, text: String, now: Instant) {
        let Some(state) = self.slots.get_mut(slot) else {
            return;
        };

        if state.text == text {
            state.staged = None;
            return;
        }

        state.staged = Some(Staged {
            text,
            due: now + COMMIT_DELAY,
        });
    }

    /// Set or clear a slot's status indicator. Applied immediately, unlike
    /// text, which goes through the staged commit.
    pub fn set_status(&mut self, slot: &str, status: Option<Status>) {
        if let Some(state) = self.slots.get_mut(slot) {
            state.status = status;
        }
    }

    /// Commit staged writes whose delay has elapsed.
    ///
    /// Returns the number of slots that changed. Committed slots are marked
    /// fresh for a short window so the UI can highlight them.
    pub fn flush(&mut self, now: Instant) -> usize {
        let mut committed = 0;
        for state in self.slots.values_mut() {
            if let Some(staged) = state.staged.take_if(|s| s.due <= now) {
                state.text = staged.text;
                state.fresh_until = Some(now + FRESH_WINDOW);
                committed += 1;
            }
        }
        committed
    }

    /// The committed text of a slot, or `None` if it was never written.
    pub fn text(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(|s| s.text.as_str()).filter(|t| !t.is_empty())
    }

    /// The status indicator of a slot.
    pub fn status(&self, slot: &str) -> Option<Status> {
        self.slots.get(slot).and_then(|s| s.status)
    }

    /// Whether a slot committed a new value within the freshness window.
    pub fn is_fresh(&self, slot: &str, now: Instant) -> bool {
        self.slots
            .get(slot)
            .and_then(|s| s.fresh_until)
            .is_some_and(|until| now < until)
    }

    /// Whether a slot has a staged write waiting to commit. The UI dims the
    /// old value during this phase of the transition.
    pub fn is_staged(&self, slot: &str) -> bool {
        self.slots.get(slot).is_some_and(|s| s.staged.is_some())
    }

    /// Whether any staged write is waiting to commit. Used by the event loop
    /// to keep redrawing while a transition is in flight.
    pub fn has_pending(&self) -> bool {
        self.slots.values().any(|s| s.staged.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TelemetryValue;

    fn committed(board: &SlotBoard, slot: &str) -> String {
        board.text(slot).unwrap_or_default().to_string()
    }

    #[test]
    fn test_format_number_with_unit() {
        let v = TelemetryValue::Number(3.14159);
        assert_eq!(format_value(&v, Some("V")), "3.14 V");
    }

    #[test]
    fn test_format_number_without_unit() {
        let v = TelemetryValue::Number(12.0);
        assert_eq!(format_value(&v, None), "12.00");
    }

    #[test]
    fn test_format_non_numbers_pass_through() {
        assert_eq!(format_value(&TelemetryValue::Text("Normal".into()), Some("V")), "Normal");
        assert_eq!(format_value(&TelemetryValue::Bool(true), None), "true");
    }

    #[test]
    fn test_text_changes_only_after_delay() {
        let mut board = SlotBoard::new();
        board.register("pv1-voltage");
        let t0 = Instant::now();

        board.push("pv1-voltage", "48.20 V".into(), t0);
        assert_eq!(board.text("pv1-voltage"), None, "must not commit before the delay");

        // Not due yet
        board.flush(t0 + Duration::from_millis(100));
        assert_eq!(board.text("pv1-voltage"), None);

        // Due
        let changed = board.flush(t0 + Duration::from_millis(200));
        assert_eq!(changed, 1);
        assert_eq!(committed(&board, "pv1-voltage"), "48.20 V");
        assert!(board.is_fresh("pv1-voltage", t0 + Duration::from_millis(250)));
    }

    #[test]
    fn test_identical_push_is_noop() {
        let mut board = SlotBoard::new();
        board.register("soc");
        let t0 = Instant::now();

        board.push("soc", "87.00 %".into(), t0);
        board.flush(t0 + Duration::from_millis(200));

        // Same value again: nothing staged, nothing committed again
        board.push("soc", "87.00 %".into(), t0 + Duration::from_millis(300));
        assert!(!board.has_pending());
        let changed = board.flush(t0 + Duration::from_millis(600));
        assert_eq!(changed, 0);
        assert_eq!(committed(&board, "soc"), "87.00 %");
    }

    #[test]
    fn test_last_writer_wins_within_delay_window() {
        let mut board = SlotBoard::new();
        board.register("load1-current");
        let t0 = Instant::now();

        board.push("load1-current", "1.10 A".into(), t0);
        board.push("load1-current", "1.25 A".into(), t0 + Duration::from_millis(50));

        board.flush(t0 + Duration::from_millis(400));
        assert_eq!(committed(&board, "load1-current"), "1.25 A");
    }

    #[test]
    fn test_push_of_committed_value_cancels_staged_write() {
        let mut board = SlotBoard::new();
        board.register("mcb1");
        let t0 = Instant::now();

        board.push("mcb1", "true".into(), t0);
        board.flush(t0 + Duration::from_millis(200));
        assert_eq!(committed(&board, "mcb1"), "true");

        // A stale flip is staged, then the latest value matches the display
        board.push("mcb1", "false".into(), t0 + Duration::from_millis(300));
        board.push("mcb1", "true".into(), t0 + Duration::from_millis(350));

        let changed = board.flush(t0 + Duration::from_millis(600));
        assert_eq!(changed, 0);
        assert_eq!(committed(&board, "mcb1"), "true");
    }

    #[test]
    fn test_unknown_slot_is_skipped() {
        let mut board = SlotBoard::new();
        let t0 = Instant::now();
        board.push("no-such-slot", "1.00".into(), t0);
        board.set_status("no-such-slot", Some(Status::Danger));
        assert_eq!(board.flush(t0 + Duration::from_secs(1)), 0);
        assert_eq!(board.text("no-such-slot"), None);
        assert_eq!(board.status("no-such-slot"), None);
    }

    #[test]
    fn test_status_applies_immediately_and_clears() {
        let mut board = SlotBoard::new();
        board.register("scc1-status");
        board.set_status("scc1-status", Some(Status::Danger));
        assert_eq!(board.status("scc1-status"), Some(Status::Danger));
        board.set_status("scc1-status", None);
        assert_eq!(board.status("scc1-status"), None);
    }

    #[test]
    fn test_freshness_expires() {
        let mut board = SlotBoard::new();
        board.register("disk-usage");
        let t0 = Instant::now();
        board.push("disk-usage", "41 %".into(), t0);
        board.flush(t0 + Duration::from_millis(200));
        assert!(board.is_fresh("disk-usage", t0 + Duration::from_millis(400)));
        assert!(!board.is_fresh("disk-usage", t0 + Duration::from_millis(600)));
    }
}
