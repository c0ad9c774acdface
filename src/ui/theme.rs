//! Theme configuration for the dashboard.
//!
//! Light and dark themes with a persisted preference. The preference lives
//! under the key `"theme"` in a small JSON key-value file in the user's
//! config directory; when absent, the terminal background decides.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use tracing::warn;

use crate::data::Status;

/// Key under which the theme preference is stored.
const THEME_KEY: &str = "theme";

/// Which of the two themes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Light,
    Dark,
}

impl ThemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Light => "light",
            ThemeKind::Dark => "dark",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(ThemeKind::Light),
            "dark" => Some(ThemeKind::Dark),
            _ => None,
        }
    }
}

/// Color and style theme for the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for active/normal status.
    pub active: Color,
    /// Color for inactive status and placeholder values.
    pub inactive: Color,
    /// Color for warning status.
    pub warning: Color,
    /// Color for danger status.
    pub danger: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows and section titles.
    pub header: Style,
    /// Style for the active sidebar entry.
    pub nav_active: Style,
    /// Style for inactive sidebar entries.
    pub nav_inactive: Style,
    /// Style for just-committed values (the restore phase highlight).
    pub fresh: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            highlight: Color::Cyan,
            active: Color::Green,
            inactive: Color::Gray,
            warning: Color::Yellow,
            danger: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            nav_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            nav_inactive: Style::default().fg(Color::Gray),
            fresh: Style::default().add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            highlight: Color::Blue,
            active: Color::Green,
            inactive: Color::DarkGray,
            warning: Color::Yellow,
            danger: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            nav_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            nav_inactive: Style::default().fg(Color::DarkGray),
            fresh: Style::default().add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    pub fn of_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::light(),
            ThemeKind::Dark => Self::dark(),
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Load the persisted preference, falling back to terminal detection.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        match prefs.get(THEME_KEY).and_then(ThemeKind::from_str) {
            Some(kind) => Self::of_kind(kind),
            None => Self::auto_detect(),
        }
    }

    /// The opposite theme, for the toggle action.
    pub fn toggled(&self) -> Self {
        match self.kind {
            ThemeKind::Light => Self::dark(),
            ThemeKind::Dark => Self::light(),
        }
    }

    /// Persist this theme as the preference.
    pub fn persist(&self, prefs: &mut Preferences) {
        prefs.set(THEME_KEY, self.kind.as_str());
    }

    /// Get style for a status indicator
    pub fn status_style(&self, status: Status) -> Style {
        match status {
            Status::Active => Style::default().fg(self.active),
            Status::Inactive => Style::default().fg(self.inactive),
            Status::Warning => Style::default().fg(self.warning),
            Status::Danger => Style::default().fg(self.danger).add_modifier(Modifier::BOLD),
        }
    }
}

/// A small persisted key-value store for UI preferences.
///
/// Backed by a JSON object in a single file. Writes go straight to disk;
/// failures are logged and otherwise ignored (losing a preference is not
/// worth interrupting the dashboard).
#[derive(Debug)]
pub struct Preferences {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl Preferences {
    /// Open the preferences store at the default location
    /// (`<config dir>/powerdesk/preferences.json`).
    pub fn open_default() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("powerdesk");
        Self::open(dir.join("preferences.json"))
    }

    /// Open a preferences store at an explicit path.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.save();
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(&self.values) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), "failed to save preferences: {}", e);
                }
            }
            Err(e) => warn!("failed to serialize preferences: {}", e),
        }
    }
}
