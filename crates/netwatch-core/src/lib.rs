// netwatch-core: Dashboard orchestration between netwatch-api and front-ends.

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod format;
pub mod timer;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chart::{
    ChartCanvas, ChartData, ChartFactory, ChartHandle, ChartKind, ChartMode, ModalChart,
};
pub use config::DashboardConfig;
pub use controller::{AlertFilters, DashboardController, RefreshState};
pub use error::CoreError;
pub use events::{ControlId, EventTable, LogLevel, UiEvent};
pub use timer::{RefreshTick, RefreshTimer};
pub use view::{
    AlertDetail, AlertRow, ComponentRow, DashboardView, Listing, LogRow, MetricRow, Notification,
    NotificationKind, OverviewCard, StatusIndicator, TopSourceRow,
};

// Wire types front-ends commonly need alongside the controller.
pub use netwatch_api::{AlertStatus, Severity};
