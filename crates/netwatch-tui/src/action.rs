//! All possible UI actions. Actions are the sole mechanism for state mutation.
//!
//! Two producers feed the same channel: the terminal (keys, focus, ticks)
//! and the dashboard controller task, whose view and chart handles report
//! every region update as an action.

use chrono::{DateTime, Local};

use netwatch_core::{
    AlertDetail, AlertRow, ChartCanvas, ChartKind, ComponentRow, ControlId, Listing, LogRow,
    MetricRow, Notification, OverviewCard, StatusIndicator, TopSourceRow,
};

/// Identifies one chart handle for the lifetime of the process.
pub type ChartId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Application ──
    Quit,
    Resize(u16, u16),
    Tick,
    Render,
    ToggleHelp,

    /// A control interaction, translated through the event table and
    /// forwarded to the controller.
    Control(ControlId, Option<String>),

    // ── Controller → view ──
    Loading(bool),
    OverviewCard(OverviewCard, String),
    StatusIndicator(StatusIndicator),
    AlertsUpdated(Listing<AlertRow>),
    ComponentsUpdated(Vec<ComponentRow>),
    MetricsUpdated(Vec<MetricRow>),
    LogsUpdated(Listing<LogRow>),
    TopSourcesUpdated(Listing<TopSourceRow>),
    OpenAlertModal(AlertDetail),
    CloseAlertModal,
    OpenChartModal(String),
    CloseChartModal,
    Notify(Notification),
    LastUpdate(DateTime<Local>),

    // ── Controller → charts ──
    ChartCreated {
        id: ChartId,
        canvas: ChartCanvas,
        kind: ChartKind,
    },
    ChartData {
        id: ChartId,
        labels: Vec<String>,
        series: Vec<f64>,
    },
    ChartDestroyed(ChartId),
}
