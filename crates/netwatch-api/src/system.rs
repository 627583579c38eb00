// System endpoints
//
// Overall health with host metrics, per-component status, and the
// backend's own log stream.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ComponentInfo, HealthReport, LogEntry};

#[derive(Deserialize)]
struct HealthEnvelope {
    health: HealthReport,
}

#[derive(Deserialize)]
struct ComponentsEnvelope {
    #[serde(default)]
    components: IndexMap<String, ComponentInfo>,
}

#[derive(Deserialize)]
struct LogsEnvelope {
    #[serde(default)]
    logs: Vec<LogEntry>,
}

impl ApiClient {
    /// Overall health and host resource metrics.
    ///
    /// `GET /api/status/health`
    pub async fn health(&self) -> Result<HealthReport, Error> {
        let url = self.api_url("status/health", &[])?;
        debug!("fetching system health");
        let envelope: HealthEnvelope = self.get(url).await?;
        Ok(envelope.health)
    }

    /// Per-component status, in the order the backend lists them.
    ///
    /// `GET /api/status/components`
    pub async fn components(&self) -> Result<IndexMap<String, ComponentInfo>, Error> {
        let url = self.api_url("status/components", &[])?;
        debug!("fetching component status");
        let envelope: ComponentsEnvelope = self.get(url).await?;
        Ok(envelope.components)
    }

    /// Most recent log entries, newest first as the backend returns them.
    ///
    /// `GET /api/status/logs?limit=N[&level=L]`
    pub async fn system_logs(
        &self,
        limit: u32,
        level: Option<&str>,
    ) -> Result<Vec<LogEntry>, Error> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(level) = level {
            query.push(("level", level.to_owned()));
        }
        let url = self.api_url("status/logs", &query)?;
        debug!(limit, ?level, "fetching system logs");
        let envelope: LogsEnvelope = self.get(url).await?;
        Ok(envelope.logs)
    }
}
