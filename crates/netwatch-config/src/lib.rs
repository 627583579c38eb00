//! Shared configuration for the netwatch dashboard.
//!
//! TOML profiles merged with `NETWATCH_` environment variables, and
//! translation to `netwatch_core::DashboardConfig`. The binary layers its
//! command-line overrides on top of the result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netwatch_core::DashboardConfig;

/// Backend address used when no profile names one.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh period, e.g. "30s" or "2m". "0s" disables it.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            insecure: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> String {
    "30s".into()
}

/// A named backend profile. Unset fields fall back to [`Defaults`] or
/// the dashboard's built-in values.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "http://10.0.0.5:5000").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    pub timeout: Option<u64>,

    pub refresh_interval: Option<String>,

    /// Accept self-signed certificates.
    pub insecure: Option<bool>,

    /// Initial traffic chart window in hours.
    pub traffic_hours: Option<u32>,

    pub alert_limit: Option<u32>,

    pub log_limit: Option<u32>,

    pub top_sources_limit: Option<u32>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: None,
            refresh_interval: None,
            insecure: None,
            traffic_hours: None,
            alert_limit: None,
            log_limit: None,
            top_sources_limit: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

impl Config {
    /// Name of the profile to use: the requested one, else the configured
    /// default, else `"default"`.
    pub fn active_profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
    }

    /// Resolve a profile into dashboard settings.
    ///
    /// An explicitly requested profile must exist. When none is requested
    /// and the default profile is absent, built-in values are used.
    pub fn dashboard_config(
        &self,
        requested: Option<&str>,
    ) -> Result<DashboardConfig, ConfigError> {
        let name = self.active_profile_name(requested);
        match self.profiles.get(name) {
            Some(profile) => profile_to_dashboard_config(profile, &self.defaults),
            None if requested.is_some() => Err(ConfigError::UnknownProfile {
                profile: name.into(),
            }),
            None => profile_to_dashboard_config(&Profile::default(), &self.defaults),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "netwatch", "netwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is
/// not an error; built-in defaults apply.
///
/// Nested keys in the environment use a double underscore, e.g.
/// `NETWATCH_DEFAULTS__REFRESH_INTERVAL=1m`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a humantime interval such as `"45s"` or `"1m 30s"`.
pub fn parse_interval(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{raw}': {e}"),
    })
}

/// Build a `DashboardConfig` from a profile, with no CLI overrides.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let refresh = profile
        .refresh_interval
        .as_deref()
        .unwrap_or(&defaults.refresh_interval);

    let mut config = DashboardConfig::new(api_url);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval = parse_interval("refresh_interval", refresh)?;
    config.accept_invalid_certs = profile.insecure.unwrap_or(defaults.insecure);

    if let Some(hours) = profile.traffic_hours {
        if hours == 0 {
            return Err(ConfigError::Validation {
                field: "traffic_hours".into(),
                reason: "must be at least 1".into(),
            });
        }
        config.traffic_hours = hours;
    }
    if let Some(limit) = profile.alert_limit {
        config.alert_limit = limit;
    }
    if let Some(limit) = profile.log_limit {
        config.log_limit = limit;
    }
    if let Some(limit) = profile.top_sources_limit {
        config.top_sources_limit = limit;
    }

    Ok(config)
}
