//! Startup configuration.
//!
//! The configuration file is JSON with camelCase keys (`apiKey`,
//! `updateInterval` in milliseconds, `routes`, ...). It is read and
//! validated once; the resulting [`Settings`] are split into
//! the per-component configs.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::display::DisplayConfig;
use crate::domain::{ProductsMask, Route, TransportType, VehicleIcon};
use crate::resrobot::{DEFAULT_BASE_URL, ResRobotConfig};
use crate::scheduler::SchedulerConfig;

/// Largest accepted `skipMinutes`: one day.
pub const MAX_SKIP_MINUTES: i64 = 24 * 60;

/// Errors from loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or has bad values
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Raw configuration as written in the file. Missing keys take their
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Trip search endpoint
    pub api_base: String,
    pub api_key: String,
    /// Base polling interval in milliseconds
    pub update_interval: u64,
    pub skip_minutes: i64,
    pub maximum_entries: usize,
    pub truncate_after: usize,
    pub transport_types: Vec<TransportType>,
    pub routes: Vec<Route>,
    /// CSS class per category code prefix, e.g. `{"B": "fa fa-bus"}`
    pub icon_table: HashMap<String, String>,
    pub language: String,
    pub fade: bool,
    pub fade_point: f64,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Address to serve the board on, e.g. `127.0.0.1:3000`
    pub listen: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            update_interval: 5 * 60 * 1000,
            skip_minutes: 0,
            maximum_entries: 6,
            truncate_after: 0,
            transport_types: TransportType::ALL.to_vec(),
            routes: Vec::new(),
            icon_table: HashMap::new(),
            language: "en".to_string(),
            fade: true,
            fade_point: 0.25,
            timeout_secs: 30,
            listen: None,
        }
    }
}

/// Validated configuration, split per component.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ResRobotConfig,
    pub scheduler: SchedulerConfig,
    pub display: DisplayConfig,
    pub routes: Vec<Route>,
    pub language: String,
    pub listen: Option<SocketAddr>,
}

impl AppConfig {
    /// Read a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the API key, e.g. from the environment.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key {
            self.api_key = key;
        }
        self
    }

    /// Check values and build the per-component configs.
    ///
    /// An empty route list is not an error here: the scheduler reports it
    /// to the display instead of polling.
    pub fn validate(self) -> Result<Settings, ConfigError> {
        if self.update_interval == 0 {
            return Err(ConfigError::Invalid(
                "updateInterval must be greater than zero".to_string(),
            ));
        }

        if !(0..=MAX_SKIP_MINUTES).contains(&self.skip_minutes) {
            return Err(ConfigError::Invalid(format!(
                "skipMinutes must be between 0 and {MAX_SKIP_MINUTES}"
            )));
        }

        if !self.fade_point.is_finite() {
            return Err(ConfigError::Invalid(
                "fadePoint must be a finite number".to_string(),
            ));
        }

        reqwest::Url::parse(&self.api_base)
            .map_err(|e| ConfigError::Invalid(format!("apiBase {:?}: {e}", self.api_base)))?;

        let icon_classes = parse_icon_table(&self.icon_table)?;

        let listen = self
            .listen
            .as_deref()
            .map(|addr| {
                addr.parse::<SocketAddr>()
                    .map_err(|e| ConfigError::Invalid(format!("listen {addr:?}: {e}")))
            })
            .transpose()?;

        let client = ResRobotConfig::new(self.api_key)
            .with_base_url(self.api_base)
            .with_products(ProductsMask::from_types(&self.transport_types))
            .with_timeout(self.timeout_secs);

        let scheduler = SchedulerConfig::new(
            Duration::from_millis(self.update_interval),
            self.skip_minutes,
            self.maximum_entries,
            self.truncate_after,
        );

        let display = DisplayConfig {
            max_rows: self.maximum_entries,
            skip_minutes: self.skip_minutes,
            fade: self.fade,
            fade_point: self.fade_point,
            icon_classes,
        };

        Ok(Settings {
            client,
            scheduler,
            display,
            routes: self.routes,
            language: self.language,
            listen,
        })
    }
}

/// Map icon table keys (category code prefixes) onto icons.
fn parse_icon_table(
    table: &HashMap<String, String>,
) -> Result<HashMap<VehicleIcon, String>, ConfigError> {
    let mut classes = HashMap::new();

    for (key, class) in table {
        let mut chars = key.chars();
        let icon = match (chars.next(), chars.next()) {
            (Some(c), None) => VehicleIcon::from_char(c),
            _ => None,
        }
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "iconTable key {key:?} is not one of B, S, U, J, F"
            ))
        })?;
        classes.insert(icon, class.clone());
    }

    Ok(classes)
}
