// ── View models and the view trait ──
//
// Everything the controller hands to a renderer is an owned, already
// formatted value. The alert table and the alert detail modal get
// separate models built from the same wire `Alert`, so neither can
// observe the other's state.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use netwatch_api::{Alert, AlertStatus, ComponentInfo, LogEntry, SystemMetrics, TopSource};
use strum::{Display, EnumIter};

use crate::format;

pub const NO_ALERTS: &str = "No alerts found";
pub const NO_LOGS: &str = "No logs available";
pub const NO_SOURCES: &str = "No traffic recorded";

// ── Listings ─────────────────────────────────────────────────────────

/// A list region: either real rows or a single placeholder row.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Placeholder(&'static str),
    Rows(Vec<T>),
}

impl<T> Listing<T> {
    /// Wrap `rows`, substituting `placeholder` when there are none.
    pub fn new(rows: Vec<T>, placeholder: &'static str) -> Self {
        if rows.is_empty() {
            Self::Placeholder(placeholder)
        } else {
            Self::Rows(rows)
        }
    }

    /// Number of rendered rows (a placeholder is one row).
    pub fn rendered_len(&self) -> usize {
        match self {
            Self::Placeholder(_) => 1,
            Self::Rows(rows) => rows.len(),
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            Self::Placeholder(_) => &[],
            Self::Rows(rows) => rows,
        }
    }
}

// ── Overview ─────────────────────────────────────────────────────────

/// The four metric cards across the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum OverviewCard {
    #[strum(to_string = "Active Alerts")]
    ActiveAlerts,
    #[strum(to_string = "Network Traffic")]
    NetworkTraffic,
    #[strum(to_string = "Anomalies")]
    Anomalies,
    #[strum(to_string = "System Health")]
    SystemHealth,
}

/// Header badge summarising overall health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    /// Raw health status, used as the style class.
    pub class: String,
    /// e.g. "System Healthy"
    pub text: String,
}

impl StatusIndicator {
    pub fn from_status(raw: &str) -> Self {
        Self {
            class: raw.to_owned(),
            text: format!("System {}", format::capitalize(raw)),
        }
    }
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRow {
    pub id: u64,
    pub timestamp: String,
    pub alert_type: String,
    pub source_ip: String,
    pub destination_ip: String,
    pub severity: String,
    pub severity_class: String,
    pub status: String,
    pub status_class: String,
    pub description: String,
    /// Row shows an acknowledge action.
    pub can_acknowledge: bool,
}

impl From<&Alert> for AlertRow {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id,
            timestamp: format::format_datetime(alert.timestamp.as_ref()),
            alert_type: alert.alert_type.clone(),
            source_ip: alert.source_ip.clone(),
            destination_ip: alert.destination_ip.clone(),
            severity: alert.severity.to_string(),
            severity_class: format::severity_class(&alert.severity),
            status: alert.status.to_string(),
            status_class: format::status_class(&alert.status),
            description: format::truncate_description(&alert.description),
            can_acknowledge: alert.status == AlertStatus::Active,
        }
    }
}

/// Full detail for the alert modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDetail {
    pub id: u64,
    pub alert_type: String,
    pub timestamp: String,
    pub source_ip: String,
    pub destination_ip: String,
    pub port: String,
    pub protocol: String,
    pub severity: String,
    pub severity_class: String,
    pub status: String,
    pub status_class: String,
    pub description: String,
    /// Pretty-printed details, only when there are any.
    pub details: Option<String>,
    /// Modal shows the acknowledge button.
    pub can_acknowledge: bool,
}

impl From<&Alert> for AlertDetail {
    fn from(alert: &Alert) -> Self {
        let details = alert
            .details
            .as_ref()
            .filter(|map| !map.is_empty())
            .and_then(|map| serde_json::to_string_pretty(map).ok());

        Self {
            id: alert.id,
            alert_type: alert.alert_type.clone(),
            timestamp: format::format_datetime(alert.timestamp.as_ref()),
            source_ip: alert.source_ip.clone(),
            destination_ip: alert.destination_ip.clone(),
            port: alert
                .port
                .map_or_else(|| format::NOT_AVAILABLE.into(), |p| p.to_string()),
            protocol: alert
                .protocol
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| format::NOT_AVAILABLE.into()),
            severity: alert.severity.to_string(),
            severity_class: format::severity_class(&alert.severity),
            status: alert.status.to_string(),
            status_class: format::status_class(&alert.status),
            description: alert.description.clone(),
            details,
            can_acknowledge: alert.status == AlertStatus::Active,
        }
    }
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
    /// Display name ("Detection Engine").
    pub name: String,
    /// Raw status, also the style class suffix.
    pub status: String,
}

impl ComponentRow {
    pub fn from_components(components: &IndexMap<String, ComponentInfo>) -> Vec<Self> {
        components
            .iter()
            .map(|(name, info)| Self {
                name: format::component_display_name(name),
                status: info.status.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    pub name: &'static str,
    pub value: String,
}

impl MetricRow {
    pub fn from_metrics(metrics: &SystemMetrics) -> Vec<Self> {
        vec![
            Self::new("CPU Usage", format::format_percent(metrics.cpu_percent)),
            Self::new("Memory Usage", format::format_percent(metrics.memory_percent)),
            Self::new("Disk Usage", format::format_percent(metrics.disk_percent)),
            Self::new("Memory Available", format::format_gb(metrics.memory_available_gb)),
            Self::new("Disk Free", format::format_gb(metrics.disk_free_gb)),
        ]
    }

    fn new(name: &'static str, value: String) -> Self {
        Self { name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub time: String,
    pub level: String,
    /// `log-<lowercase level>`
    pub level_class: String,
    pub message: String,
    pub component: Option<String>,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            time: format::format_datetime(entry.timestamp.as_ref()),
            level: entry.level.clone(),
            level_class: format!("log-{}", entry.level.to_lowercase()),
            message: entry.message.clone(),
            component: entry.component.clone(),
        }
    }
}

// ── Network ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSourceRow {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub source_ip: String,
    pub bytes: String,
    pub packets: u64,
    pub connections: u64,
}

impl TopSourceRow {
    pub fn ranked(sources: &[TopSource]) -> Vec<Self> {
        sources
            .iter()
            .enumerate()
            .map(|(idx, src)| Self {
                rank: idx + 1,
                source_ip: src.source_ip.clone(),
                bytes: format::format_bytes(src.total_bytes),
                packets: src.total_packets,
                connections: src.connection_count,
            })
            .collect()
    }
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

// ── DashboardView ────────────────────────────────────────────────────

/// A renderer for the dashboard's regions.
///
/// The controller calls these from its own task, one at a time. Each
/// region is replaced wholesale; implementations never need to diff.
pub trait DashboardView: Send {
    fn show_loading(&mut self, loading: bool);

    fn render_overview_card(&mut self, card: OverviewCard, value: String);

    fn render_status_indicator(&mut self, indicator: StatusIndicator);

    fn render_alerts(&mut self, alerts: Listing<AlertRow>);

    fn render_components(&mut self, components: Vec<ComponentRow>);

    fn render_metrics(&mut self, metrics: Vec<MetricRow>);

    fn render_logs(&mut self, logs: Listing<LogRow>);

    fn render_top_sources(&mut self, sources: Listing<TopSourceRow>);

    fn open_alert_modal(&mut self, detail: AlertDetail);

    fn close_alert_modal(&mut self);

    /// Show the chart modal frame and lock background scrolling.
    fn open_chart_modal(&mut self, title: &str);

    /// Hide the chart modal frame and restore scrolling.
    fn close_chart_modal(&mut self);

    fn notify(&mut self, notification: Notification);

    fn set_last_update(&mut self, at: DateTime<Local>);
}
