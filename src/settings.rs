//! Configuration layer.
//!
//! Settings are merged from three layers, later layers winning: an optional
//! TOML file, `POWERDESK_*` environment variables, and CLI overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Default backend address (the PowerDesk web service).
const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Default poll interval in seconds.
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the PowerDesk backend.
    pub server: String,
    /// Seconds between scheduled poll ticks.
    pub interval_secs: u64,
    /// Websocket URL of the live push channel, if the site runs one.
    pub live_url: Option<String>,
    /// Site name shown in the header.
    pub site_name: String,
    /// Whether to show the login form before the dashboard.
    pub require_login: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            live_url: None,
            site_name: "PowerDesk".to_string(),
            require_login: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional config file plus the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server", DEFAULT_SERVER)?
            .set_default("interval_secs", DEFAULT_INTERVAL_SECS)?
            .set_default("site_name", "PowerDesk")?
            .set_default("require_login", false)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("POWERDESK"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// The poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// The login form's POST target.
    pub fn login_url(&self) -> String {
        format!("{}/login", self.server.trim_end_matches('/'))
    }
}
