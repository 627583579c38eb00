//! Bridge between the dashboard controller task and the TUI.
//!
//! The controller renders through [`ChannelView`] and draws through
//! [`ChannelCharts`]; both turn every call into an [`Action`] on the
//! TUI's action channel. UI events flow back on a second channel that
//! the controller's run loop consumes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use netwatch_core::{
    AlertDetail, AlertRow, ChartCanvas, ChartFactory, ChartHandle, ChartKind, ComponentRow,
    DashboardConfig, DashboardController, DashboardView, Listing, LogRow, MetricRow,
    Notification, OverviewCard, StatusIndicator, TopSourceRow, UiEvent,
};

use crate::action::{Action, ChartId};

// ── View ────────────────────────────────────────────────────────────

/// `DashboardView` that forwards every region update as an action.
///
/// Sends are fire-and-forget: once the TUI has quit, nobody is listening.
pub struct ChannelView {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelView {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }

    fn send(&self, action: Action) {
        let _ = self.tx.send(action);
    }
}

impl DashboardView for ChannelView {
    fn show_loading(&mut self, loading: bool) {
        self.send(Action::Loading(loading));
    }

    fn render_overview_card(&mut self, card: OverviewCard, value: String) {
        self.send(Action::OverviewCard(card, value));
    }

    fn render_status_indicator(&mut self, indicator: StatusIndicator) {
        self.send(Action::StatusIndicator(indicator));
    }

    fn render_alerts(&mut self, alerts: Listing<AlertRow>) {
        self.send(Action::AlertsUpdated(alerts));
    }

    fn render_components(&mut self, components: Vec<ComponentRow>) {
        self.send(Action::ComponentsUpdated(components));
    }

    fn render_metrics(&mut self, metrics: Vec<MetricRow>) {
        self.send(Action::MetricsUpdated(metrics));
    }

    fn render_logs(&mut self, logs: Listing<LogRow>) {
        self.send(Action::LogsUpdated(logs));
    }

    fn render_top_sources(&mut self, sources: Listing<TopSourceRow>) {
        self.send(Action::TopSourcesUpdated(sources));
    }

    fn open_alert_modal(&mut self, detail: AlertDetail) {
        self.send(Action::OpenAlertModal(detail));
    }

    fn close_alert_modal(&mut self) {
        self.send(Action::CloseAlertModal);
    }

    fn open_chart_modal(&mut self, title: &str) {
        self.send(Action::OpenChartModal(title.to_owned()));
    }

    fn close_chart_modal(&mut self) {
        self.send(Action::CloseChartModal);
    }

    fn notify(&mut self, notification: Notification) {
        self.send(Action::Notify(notification));
    }

    fn set_last_update(&mut self, at: DateTime<Local>) {
        self.send(Action::LastUpdate(at));
    }
}

// ── Charts ──────────────────────────────────────────────────────────

/// Hands out chart handles with process-unique ids.
pub struct ChannelCharts {
    tx: mpsc::UnboundedSender<Action>,
    next_id: Arc<AtomicU64>,
}

impl ChannelCharts {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl ChartFactory for ChannelCharts {
    fn create(&mut self, canvas: ChartCanvas, kind: ChartKind) -> Box<dyn ChartHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, %canvas, %kind, "creating chart");
        let _ = self.tx.send(Action::ChartCreated { id, canvas, kind });
        Box::new(ChannelChart {
            id,
            tx: self.tx.clone(),
            destroyed: false,
        })
    }
}

struct ChannelChart {
    id: ChartId,
    tx: mpsc::UnboundedSender<Action>,
    destroyed: bool,
}

impl ChartHandle for ChannelChart {
    fn set_data(&mut self, labels: Vec<String>, series: Vec<f64>) {
        if self.destroyed {
            return;
        }
        let _ = self.tx.send(Action::ChartData {
            id: self.id,
            labels,
            series,
        });
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            let _ = self.tx.send(Action::ChartDestroyed(self.id));
        }
    }
}

// ── Controller task ─────────────────────────────────────────────────

/// Handle to the running controller task.
pub struct ControllerTask {
    pub events: mpsc::UnboundedSender<UiEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ControllerTask {
    /// Build the controller around the channel view and start its run loop.
    pub fn spawn(
        config: DashboardConfig,
        action_tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<Self> {
        let controller = DashboardController::new(
            config,
            Box::new(ChannelView::new(action_tx.clone())),
            Box::new(ChannelCharts::new(action_tx.clone())),
        )?;

        let (events, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(controller.run(rx, cancel.clone()));
        info!("dashboard controller started");

        Ok(Self {
            events,
            cancel,
            handle,
        })
    }

    /// Stop the run loop and wait for the controller to release its charts.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            debug!(error = %e, "controller task ended abnormally");
        }
    }
}
