//! Application state and navigation logic.
//!
//! The `App` is the single context object for one dashboard session: it owns
//! the ingestion sources, the slot board, the theme, and the shell state
//! (view navigation, sidebar, notices, login gate). It is constructed once
//! at startup and torn down explicitly when the session ends.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::data::{FieldTable, SlotBoard};
use crate::login::{LoginForm, LoginOutcome};
use crate::settings::Settings;
use crate::source::TelemetrySource;
use crate::source::PollerHandle;
use crate::ui::{Preferences, Theme};

#[cfg(feature = "live")]
use crate::source::LiveEvents;

/// How long a notice stays on screen before auto-dismissing.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Terminal width below which the sidebar collapses automatically.
const SIDEBAR_BREAKPOINT: u16 = 100;

/// The current view/tab of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Device information and the low-voltage-disconnect unit.
    Overview,
    /// The three solar charge controllers.
    Chargers,
    /// Battery bank measurements.
    Battery,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Chargers,
            View::Chargers => View::Battery,
            View::Battery => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Battery,
            View::Chargers => View::Overview,
            View::Battery => View::Chargers,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Chargers => "Chargers",
            View::Battery => "Battery",
        }
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message shown near the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    created: Instant,
}

/// State of the connection badge in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionBadge {
    /// Live channel up.
    Online,
    /// Live channel configured but down.
    Offline,
    /// No live channel; REST polling only.
    Polling,
}

/// The login gate shown before the dashboard when the site requires it.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pub form: LoginForm,
    outcome: Option<mpsc::Receiver<LoginOutcome>>,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub sidebar_open: bool,

    // Ingestion
    sources: Vec<Box<dyn TelemetrySource>>,
    poller: Option<PollerHandle>,
    #[cfg(feature = "live")]
    live: Option<LiveEvents>,

    // Display state
    pub fields: FieldTable,
    pub board: SlotBoard,
    pub theme: Theme,
    prefs: Preferences,

    // Shell
    pub site_name: String,
    pub notices: Vec<Notice>,
    pub login: Option<LoginScreen>,
    login_url: String,
}

impl App {
    /// Create the app context from settings and the preferences store.
    pub fn new(settings: &Settings, prefs: Preferences) -> Self {
        let fields = FieldTable::new();
        let board = fields.build_board();
        let theme = Theme::from_preferences(&prefs);
        let login = settings.require_login.then(LoginScreen::default);

        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            sidebar_open: true,
            sources: Vec::new(),
            poller: None,
            #[cfg(feature = "live")]
            live: None,
            fields,
            board,
            theme,
            prefs,
            site_name: settings.site_name.clone(),
            notices: Vec::new(),
            login,
            login_url: settings.login_url(),
        }
    }

    /// Attach a telemetry source. Both ingestion paths feed the same board.
    pub fn attach_source(&mut self, source: Box<dyn TelemetrySource>) {
        self.sources.push(source);
    }

    /// Attach the poll-schedule handle.
    pub fn attach_poller(&mut self, handle: PollerHandle) {
        self.poller = Some(handle);
    }

    /// Attach the live channel's lifecycle outputs.
    #[cfg(feature = "live")]
    pub fn attach_live(&mut self, events: LiveEvents) {
        self.live = Some(events);
    }

    /// One pass of the event loop's data work: drain every source, apply
    /// updates to the board, collect alerts and login outcomes, commit due
    /// writes, expire notices.
    pub fn update(&mut self, now: Instant) {
        for source in &mut self.sources {
            while let Some(update) = source.poll() {
                self.fields.apply_update(update.domain, &update.snapshot, &mut self.board, now);
            }
        }

        #[cfg(feature = "live")]
        if let Some(live) = &mut self.live {
            while let Ok(alert) = live.alerts.try_recv() {
                let level = match alert.kind.as_str() {
                    "danger" | "error" => NoticeLevel::Error,
                    _ => NoticeLevel::Info,
                };
                self.notices.push(Notice {
                    message: alert.message,
                    level,
                    created: now,
                });
            }
        }

        self.poll_login_outcome(now);
        self.board.flush(now);
        self.notices.retain(|n| now.duration_since(n.created) < NOTICE_TTL);
    }

    /// The header badge state.
    pub fn connection_badge(&self) -> ConnectionBadge {
        #[cfg(feature = "live")]
        if let Some(live) = &self.live {
            return if *live.connected.borrow() {
                ConnectionBadge::Online
            } else {
                ConnectionBadge::Offline
            };
        }
        ConnectionBadge::Polling
    }

    /// Descriptions of all attached sources, for the status bar.
    pub fn source_descriptions(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.description()).collect()
    }

    /// The most recent error reported by any source.
    pub fn source_error(&self) -> Option<String> {
        self.sources.iter().find_map(|s| s.error())
    }

    /// Show a transient notice.
    pub fn push_notice(&mut self, message: impl Into<String>, level: NoticeLevel, now: Instant) {
        self.notices.push(Notice {
            message: message.into(),
            level,
            created: now,
        });
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the sidebar.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Responsive collapse: narrow terminals hide the sidebar, wide ones
    /// restore it (the original's small-screen behavior).
    pub fn handle_resize(&mut self, width: u16) {
        self.sidebar_open = width >= SIDEBAR_BREAKPOINT;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Toggle the theme and persist the choice.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.theme.persist(&mut self.prefs);
    }

    /// Manual refresh: trigger one poll tick now.
    pub fn refresh(&mut self, now: Instant) {
        if let Some(poller) = &self.poller {
            poller.refresh();
            self.push_notice("Refreshing…", NoticeLevel::Info, now);
        }
    }

    /// Validate the login form; submit it when the gate passes.
    pub fn submit_login(&mut self, now: Instant) {
        let Some(screen) = &mut self.login else {
            return;
        };
        if screen.form.submitting {
            return;
        }

        match screen.form.validate() {
            Ok(()) => {
                screen.form.submitting = true;
                screen.outcome = Some(crate::login::submit(
                    &self.login_url,
                    &screen.form.username,
                    &screen.form.password,
                ));
            }
            Err(message) => {
                self.notices.push(Notice {
                    message: message.to_string(),
                    level: NoticeLevel::Error,
                    created: now,
                });
            }
        }
    }

    /// Check for a completed login POST.
    fn poll_login_outcome(&mut self, now: Instant) {
        let Some(screen) = &mut self.login else {
            return;
        };
        let Some(rx) = &mut screen.outcome else {
            return;
        };

        match rx.try_recv() {
            Ok(LoginOutcome::Accepted) => {
                self.login = None;
                self.push_notice("Signed in", NoticeLevel::Info, now);
            }
            Ok(LoginOutcome::Rejected(message)) => {
                screen.form.submitting = false;
                screen.outcome = None;
                self.notices.push(Notice {
                    message,
                    level: NoticeLevel::Error,
                    created: now,
                });
            }
            Err(_) => {}
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Explicit teardown: stop the poll schedule and the live reader.
    /// In-flight requests are allowed to finish on the runtime.
    pub fn shutdown(&mut self) {
        if let Some(poller) = &self.poller {
            poller.stop();
        }
        #[cfg(feature = "live")]
        if let Some(live) = &self.live {
            live.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, Domain, TelemetrySnapshot, TelemetryUpdate, TelemetryValue};

    fn test_app() -> App {
        let dir = tempfile::TempDir::new().unwrap();
        let prefs = Preferences::open(dir.path().join("preferences.json"));
        App::new(&Settings::default(), prefs)
    }

    #[tokio::test]
    async fn test_update_applies_sourced_snapshots() {
        let mut app = test_app();
        let (tx, source) = ChannelSource::create("test");
        app.attach_source(Box::new(source));

        let mut snapshot = TelemetrySnapshot::new();
        snapshot.insert("soc".to_string(), TelemetryValue::Number(88.4));
        tx.send(TelemetryUpdate::new(Domain::Battery, snapshot)).await.unwrap();

        let t0 = Instant::now();
        app.update(t0);
        // Not yet committed: the write is staged behind the commit delay
        assert_eq!(app.board.text("battery-soc"), None);

        app.update(t0 + Duration::from_millis(200));
        assert_eq!(app.board.text("battery-soc"), Some("88.40 %"));
    }

    #[test]
    fn test_view_cycle_round_trip() {
        let mut app = test_app();
        assert_eq!(app.current_view, View::Overview);
        app.next_view();
        app.next_view();
        app.next_view();
        assert_eq!(app.current_view, View::Overview);
        app.prev_view();
        assert_eq!(app.current_view, View::Battery);
    }

    #[test]
    fn test_notices_expire() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.push_notice("hello", NoticeLevel::Info, t0);
        app.update(t0 + Duration::from_secs(1));
        assert_eq!(app.notices.len(), 1);
        app.update(t0 + Duration::from_secs(6));
        assert!(app.notices.is_empty());
    }

    #[test]
    fn test_responsive_sidebar_collapse() {
        let mut app = test_app();
        app.handle_resize(80);
        assert!(!app.sidebar_open);
        app.handle_resize(140);
        assert!(app.sidebar_open);
    }

    #[test]
    fn test_login_gate_blocks_invalid_form() {
        let dir = tempfile::TempDir::new().unwrap();
        let prefs = Preferences::open(dir.path().join("preferences.json"));
        let settings = Settings {
            require_login: true,
            ..Settings::default()
        };
        let mut app = App::new(&settings, prefs);
        assert!(app.login.is_some());

        let t0 = Instant::now();
        app.submit_login(t0);
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.notices[0].level, NoticeLevel::Error);
        assert!(!app.login.as_ref().unwrap().form.submitting);
    }

    #[test]
    fn test_connection_badge_without_live_channel() {
        let app = test_app();
        assert_eq!(app.connection_badge(), ConnectionBadge::Polling);
    }
}
