// Backend response types
//
// Models for the netwatch backend JSON API. Numeric counters default to
// zero and optional fields to `None` because the backend omits columns
// it has no data for. Enumerated strings keep unknown values verbatim in
// an `Other` variant rather than failing the whole payload.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Enumerated strings ───────────────────────────────────────────────

/// Alert severity, ordered Critical > High > Medium > Low.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Severity {
    /// The four known buckets, most severe first.
    pub const BUCKETS: [Severity; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Other(raw) => raw,
        }
    }

    /// Ordinal rank; unknown severities sort below `Low`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Other(_) => 0,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

/// Alert lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Other(String),
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Acknowledged => "Acknowledged",
            Self::Resolved => "Resolved",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for AlertStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Active" => Self::Active,
            "Acknowledged" => Self::Acknowledged,
            "Resolved" => Self::Resolved,
            _ => Self::Other(raw),
        }
    }
}

impl From<AlertStatus> for String {
    fn from(status: AlertStatus) -> Self {
        match status {
            AlertStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of the whole system or of one component (lowercase on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Unhealthy,
    Critical,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Unhealthy => "unhealthy",
            Self::Critical => "critical",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for HealthStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "healthy" => Self::Healthy,
            "warning" => Self::Warning,
            "unhealthy" => Self::Unhealthy,
            "critical" => Self::Critical,
            _ => Self::Other(raw),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Alerts ───────────────────────────────────────────────────────────

/// One alert raised by the detection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    #[serde(default, with = "flex_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// e.g. "DDoS", "Port Scan", "Unusual Traffic"
    #[serde(rename = "type")]
    pub alert_type: String,
    pub source_ip: String,
    pub destination_ip: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
    pub severity: Severity,
    pub status: AlertStatus,
    #[serde(default)]
    pub description: String,
    /// Free-form context; `None` and `{}` both mean "nothing extra".
    #[serde(default)]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// `/api/alerts/stats` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStats {
    #[serde(default)]
    pub by_status: StatusCounts,
    #[serde(default)]
    pub by_severity: SeverityCounts,
    #[serde(default)]
    pub recent_24h: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub acknowledged: u64,
    #[serde(default)]
    pub resolved: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub critical: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
}

impl SeverityCounts {
    /// Counts in [`Severity::BUCKETS`] order.
    pub fn ordered(&self) -> [u64; 4] {
        [self.critical, self.high, self.medium, self.low]
    }
}

// ── Network ──────────────────────────────────────────────────────────

/// `/api/network/stats` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default)]
    pub total_bytes_sent: u64,
    #[serde(default)]
    pub total_bytes_received: u64,
    #[serde(default)]
    pub total_packets: u64,
    #[serde(default)]
    pub total_connections: u64,
    #[serde(default)]
    pub unique_sources: u64,
    #[serde(default)]
    pub unique_destinations: u64,
}

/// `/api/network/anomalies` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub anomalies: Vec<Alert>,
}

/// One hourly bucket from `/api/network/traffic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficPoint {
    #[serde(default, with = "flex_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default)]
    pub bytes_sent: u64,
    #[serde(default)]
    pub bytes_received: u64,
    #[serde(default)]
    pub packet_count: u64,
    #[serde(default)]
    pub connection_count: u64,
}

/// One row from `/api/network/top-sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSource {
    pub source_ip: String,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default)]
    pub total_packets: u64,
    #[serde(default)]
    pub connection_count: u64,
}

// ── System ───────────────────────────────────────────────────────────

/// `/api/status/health` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(default, with = "flex_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub components: IndexMap<String, HealthStatus>,
    #[serde(default)]
    pub system_metrics: Option<SystemMetrics>,
}

/// Host resource usage reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub disk_percent: f64,
    #[serde(default)]
    pub memory_available_gb: f64,
    #[serde(default)]
    pub disk_free_gb: f64,
}

/// One entry of `/api/status/components`. Component-specific counters
/// (uptime, packets processed, ...) land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub status: HealthStatus,
    #[serde(default, with = "flex_timestamp")]
    pub last_check: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One row from `/api/status/logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, with = "flex_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub component: Option<String>,
}

// ── Timestamps ───────────────────────────────────────────────────────

/// Lenient timestamp codec.
///
/// The backend emits naive UTC timestamps (`2024-05-01T12:30:00.123456`),
/// hourly bucket labels (`2024-05-01 12:00:00`), and occasionally RFC 3339.
/// Anything unparseable becomes `None` instead of failing the payload.
pub mod flex_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse one of the backend's timestamp spellings.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}
