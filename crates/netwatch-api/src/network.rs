// Network endpoints
//
// Aggregated traffic stats, the hourly traffic series, anomaly counts,
// and the heaviest source addresses. All take an `hours` look-back window.

use serde::Deserialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AnomalyReport, NetworkStats, TopSource, TrafficPoint};

#[derive(Deserialize)]
struct StatsEnvelope {
    stats: NetworkStats,
}

#[derive(Deserialize)]
struct TrafficEnvelope {
    // Older backends call the series `data`.
    #[serde(default, alias = "data")]
    traffic_data: Vec<TrafficPoint>,
}

#[derive(Deserialize)]
struct TopSourcesEnvelope {
    #[serde(default)]
    top_sources: Vec<TopSource>,
}

impl ApiClient {
    /// Totals over the window.
    ///
    /// `GET /api/network/stats?hours=N`
    pub async fn network_stats(&self, hours: u32) -> Result<NetworkStats, Error> {
        let url = self.api_url("network/stats", &[("hours", hours.to_string())])?;
        debug!(hours, "fetching network stats");
        let envelope: StatsEnvelope = self.get(url).await?;
        Ok(envelope.stats)
    }

    /// Anomaly alerts raised within the window.
    ///
    /// `GET /api/network/anomalies?hours=N`
    pub async fn network_anomalies(&self, hours: u32) -> Result<AnomalyReport, Error> {
        let url = self.api_url("network/anomalies", &[("hours", hours.to_string())])?;
        debug!(hours, "fetching network anomalies");
        self.get(url).await
    }

    /// Hourly traffic series, oldest bucket first.
    ///
    /// `GET /api/network/traffic?hours=N`
    pub async fn traffic_series(&self, hours: u32) -> Result<Vec<TrafficPoint>, Error> {
        let url = self.api_url("network/traffic", &[("hours", hours.to_string())])?;
        debug!(hours, "fetching traffic series");
        let envelope: TrafficEnvelope = self.get(url).await?;
        Ok(envelope.traffic_data)
    }

    /// Source addresses ranked by bytes moved.
    ///
    /// `GET /api/network/top-sources?hours=N&limit=M`
    pub async fn top_sources(&self, hours: u32, limit: u32) -> Result<Vec<TopSource>, Error> {
        let url = self.api_url(
            "network/top-sources",
            &[("hours", hours.to_string()), ("limit", limit.to_string())],
        )?;
        debug!(hours, limit, "fetching top sources");
        let envelope: TopSourcesEnvelope = self.get(url).await?;
        Ok(envelope.top_sources)
    }
}
