// Alert endpoints
//
// Listing (with severity/status filters), detail, statistics, and the
// acknowledge transition.

use serde::Deserialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Alert, AlertStats, AlertStatus, Severity};

/// Query for `GET /api/alerts`.
///
/// Filters left as `None` are omitted from the query string entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertQuery {
    pub limit: u32,
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
}

impl AlertQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            severity: None,
            status: None,
        }
    }

    pub fn severity(mut self, severity: Option<Severity>) -> Self {
        self.severity = severity;
        self
    }

    pub fn status(mut self, status: Option<AlertStatus>) -> Self {
        self.status = status;
        self
    }

    /// Query pairs in wire order: `limit`, then `severity`, then `status`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(ref severity) = self.severity {
            pairs.push(("severity", severity.to_string()));
        }
        if let Some(ref status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self::new(50)
    }
}

#[derive(Deserialize)]
struct AlertsEnvelope {
    #[serde(default)]
    alerts: Vec<Alert>,
}

#[derive(Deserialize)]
struct AlertEnvelope {
    alert: Alert,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    stats: AlertStats,
}

impl ApiClient {
    /// List alerts, newest first.
    ///
    /// `GET /api/alerts?limit=N[&severity=S][&status=S]`
    pub async fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, Error> {
        let url = self.api_url("alerts", &query.to_pairs())?;
        debug!(?query, "listing alerts");
        let envelope: AlertsEnvelope = self.get(url).await?;
        Ok(envelope.alerts)
    }

    /// Fetch one alert.
    ///
    /// `GET /api/alerts/{id}`
    pub async fn get_alert(&self, id: u64) -> Result<Alert, Error> {
        let url = self.api_url(&format!("alerts/{id}"), &[])?;
        debug!(id, "fetching alert");
        let envelope: AlertEnvelope = self.get(url).await?;
        Ok(envelope.alert)
    }

    /// Alert counts by status and severity.
    ///
    /// `GET /api/alerts/stats`
    pub async fn alert_stats(&self) -> Result<AlertStats, Error> {
        let url = self.api_url("alerts/stats", &[])?;
        debug!("fetching alert stats");
        let envelope: StatsEnvelope = self.get(url).await?;
        Ok(envelope.stats)
    }

    /// Mark an alert as acknowledged.
    ///
    /// `PUT /api/alerts/{id}/acknowledge`
    pub async fn acknowledge_alert(&self, id: u64) -> Result<(), Error> {
        let url = self.api_url(&format!("alerts/{id}/acknowledge"), &[])?;
        debug!(id, "acknowledging alert");
        self.put::<serde_json::Value>(url, None).await
    }
}
