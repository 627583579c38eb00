// ── Runtime dashboard configuration ──
//
// Describes *where* the backend lives and how the dashboard polls it.
// Never touches disk: netwatch-config (or a test) builds one and hands
// it to the controller.

use std::time::Duration;

use netwatch_api::TransportConfig;
use url::Url;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root (e.g. `http://127.0.0.1:5000`).
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Background refresh period.
    pub refresh_interval: Duration,
    /// Initial traffic chart window.
    pub traffic_hours: u32,
    /// Look-back window for the overview cards and top sources.
    pub overview_hours: u32,
    /// Rows requested for the alert table.
    pub alert_limit: u32,
    /// Alerts tallied for the by-type distribution.
    pub type_sample: u32,
    /// Log rows requested.
    pub log_limit: u32,
    /// Rows in the top-sources panel.
    pub top_sources_limit: u32,
    /// Skip TLS verification (self-signed lab deployments).
    pub accept_invalid_certs: bool,
}

impl DashboardConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            traffic_hours: 24,
            overview_hours: 24,
            alert_limit: 50,
            type_sample: 100,
            log_limit: 20,
            top_sources_limit: 10,
            accept_invalid_certs: false,
        }
    }

    /// Transport settings for building the backend client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}
