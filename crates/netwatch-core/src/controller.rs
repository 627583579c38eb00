// ── Dashboard controller ──
//
// Owns every piece of mutable dashboard state (chart handles, refresh
// timer, selected alert, filter selections) and runs on a single task.
// Network work is split into `fetch_*` functions that only borrow the
// API client, joined with `tokio::join!`, and `apply_*` methods that
// write the results into the view one at a time.

use std::collections::HashMap;

use chrono::Local;
use indexmap::IndexMap;
use netwatch_api::{
    Alert, AlertQuery, AlertStats, AlertStatus, AnomalyReport, ApiClient, ComponentInfo,
    HealthReport, LogEntry, NetworkStats, Severity, TopSource, TrafficPoint,
};
use strum::Display;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::chart::{
    ChartCanvas, ChartData, ChartFactory, ChartHandle, ChartKind, ChartMode, ModalChart,
};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::events::{LogLevel, UiEvent};
use crate::format;
use crate::timer::{RefreshTick, RefreshTimer};
use crate::view::{
    AlertDetail, AlertRow, ComponentRow, DashboardView, Listing, LogRow, MetricRow, NO_ALERTS,
    NO_LOGS, NO_SOURCES, Notification, OverviewCard, StatusIndicator, TopSourceRow,
};

pub const MSG_LOAD_FAILED: &str = "Failed to load dashboard data";
pub const MSG_ALERT_DETAILS_FAILED: &str = "Failed to load alert details";
pub const MSG_ACK_FAILED: &str = "Failed to acknowledge alert";
pub const MSG_ACK_OK: &str = "Alert acknowledged successfully";

/// The chart modal always shows a full day of traffic.
const MODAL_TRAFFIC_HOURS: u32 = 24;

type ApiResult<T> = Result<T, netwatch_api::Error>;

// ── RefreshState ─────────────────────────────────────────────────

/// Refresh lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RefreshState {
    /// Not started, or shut down.
    Stopped,
    /// Visible, background refresh ticking.
    Running,
    /// Hidden, timer cleared.
    Paused,
}

/// Current alert table filters. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilters {
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
}

// ── Fetched batches ──────────────────────────────────────────────

struct OverviewBatch {
    stats: ApiResult<AlertStats>,
    network: ApiResult<NetworkStats>,
    anomalies: ApiResult<AnomalyReport>,
    health: ApiResult<HealthReport>,
}

struct AlertsBatch {
    alerts: ApiResult<Vec<Alert>>,
    chart: ApiResult<ChartData>,
}

struct StatusBatch {
    components: ApiResult<IndexMap<String, ComponentInfo>>,
    health: ApiResult<HealthReport>,
}

// ── DashboardController ──────────────────────────────────────────

/// Coordinates fetching, view-model building, and rendering.
///
/// Constructed explicitly by the front-end and driven either by calling
/// its operations directly or by handing it to [`run`](Self::run).
pub struct DashboardController {
    api: ApiClient,
    config: DashboardConfig,
    view: Box<dyn DashboardView>,
    chart_factory: Box<dyn ChartFactory>,
    charts: HashMap<ChartCanvas, Box<dyn ChartHandle>>,
    modal_chart: Option<Box<dyn ChartHandle>>,
    timer: RefreshTimer,
    ticks: mpsc::UnboundedReceiver<RefreshTick>,
    state: RefreshState,
    selected: Option<Alert>,
    filters: AlertFilters,
    log_level: Option<LogLevel>,
    chart_mode: ChartMode,
    traffic_hours: u32,
}

impl DashboardController {
    /// Build a controller and its API client from configuration.
    pub fn new(
        config: DashboardConfig,
        view: Box<dyn DashboardView>,
        chart_factory: Box<dyn ChartFactory>,
    ) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.api_url.clone(), &config.transport())?;
        Ok(Self::with_client(api, config, view, chart_factory))
    }

    /// Build a controller around an existing API client.
    pub fn with_client(
        api: ApiClient,
        config: DashboardConfig,
        view: Box<dyn DashboardView>,
        chart_factory: Box<dyn ChartFactory>,
    ) -> Self {
        let (timer, ticks) = RefreshTimer::new(config.refresh_interval);
        let traffic_hours = config.traffic_hours;
        let mut controller = Self {
            api,
            config,
            view,
            chart_factory,
            charts: HashMap::new(),
            modal_chart: None,
            timer,
            ticks,
            state: RefreshState::Stopped,
            selected: None,
            filters: AlertFilters::default(),
            log_level: None,
            chart_mode: ChartMode::default(),
            traffic_hours,
        };
        controller.ensure_summary_charts();
        controller
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn selected_alert(&self) -> Option<&Alert> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &AlertFilters {
        &self.filters
    }

    pub fn chart_mode(&self) -> ChartMode {
        self.chart_mode
    }

    pub fn traffic_hours(&self) -> u32 {
        self.traffic_hours
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    pub fn has_modal_chart(&self) -> bool {
        self.modal_chart.is_some()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// `Stopped → Running`: full load, then start the refresh cadence.
    pub async fn start(&mut self) {
        if self.state != RefreshState::Stopped {
            debug!(state = %self.state, "start ignored");
            return;
        }
        self.ensure_summary_charts();
        self.load_initial_data().await;
        self.timer.start();
        self.state = RefreshState::Running;
        info!("dashboard running");
    }

    /// Drive the refresh lifecycle from page/terminal visibility.
    ///
    /// Hiding clears the timer and discards queued ticks; requests already
    /// in flight still complete and apply. Showing a paused dashboard
    /// performs exactly one full reload and resumes the cadence.
    pub async fn set_visibility(&mut self, visible: bool) {
        match (self.state, visible) {
            (RefreshState::Running, false) => {
                self.timer.stop();
                while self.ticks.try_recv().is_ok() {}
                self.state = RefreshState::Paused;
                info!("dashboard hidden, refresh paused");
            }
            (RefreshState::Paused, true) => {
                info!("dashboard visible, reloading");
                self.load_initial_data().await;
                self.timer.start();
                self.state = RefreshState::Running;
            }
            _ => debug!(state = %self.state, visible, "visibility unchanged"),
        }
    }

    /// Stop the timer and release every chart. Terminal until `start()`.
    pub fn shutdown(&mut self) {
        self.timer.stop();
        for (canvas, mut chart) in self.charts.drain() {
            debug!(%canvas, "destroying chart");
            chart.destroy();
        }
        if let Some(mut chart) = self.modal_chart.take() {
            chart.destroy();
        }
        self.state = RefreshState::Stopped;
        info!("dashboard stopped");
    }

    /// Run until cancelled or until the event sender is dropped.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<UiEvent>,
        cancel: CancellationToken,
    ) {
        self.start().await;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event).await;
                }
                Some(tick) = self.ticks.recv() => self.handle_tick(tick).await,
            }
        }

        self.shutdown();
    }

    /// Route one UI event to its operation.
    pub async fn handle_event(&mut self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::RefreshAlerts => self.load_alerts().await,
            UiEvent::SetSeverityFilter(severity) => {
                self.filters.severity = severity;
                self.load_alerts().await;
            }
            UiEvent::SetStatusFilter(status) => {
                self.filters.status = status;
                self.load_alerts().await;
            }
            UiEvent::SetTrafficRange(hours) => self.load_traffic_data(hours).await,
            UiEvent::SetChartMode(mode) => self.update_alerts_chart(mode).await,
            UiEvent::CloseAlertModal => self.close_alert_modal(),
            UiEvent::AcknowledgeSelected => self.acknowledge_alert().await,
            UiEvent::ViewAlert(id) => self.view_alert(id).await,
            UiEvent::AcknowledgeAlert(id) => self.acknowledge_alert_from_table(id).await,
            UiEvent::OpenChartModal(chart) => self.show_chart_modal(chart).await,
            UiEvent::CloseChartModal => self.close_chart_modal(),
            UiEvent::SetLogLevel(level) => {
                self.log_level = level;
                self.load_system_logs().await;
            }
            UiEvent::SetVisibility(visible) => self.set_visibility(visible).await,
        }
    }

    /// Run a refresh cycle if `tick` belongs to the live timer run.
    pub async fn handle_tick(&mut self, tick: RefreshTick) {
        if self.state == RefreshState::Running && self.timer.is_current(tick) {
            self.refresh_cycle().await;
        } else {
            debug!(epoch = tick.epoch, "discarding stale refresh tick");
        }
    }

    // ── Loads ────────────────────────────────────────────────────

    /// Fetch every region concurrently and render whatever succeeded.
    /// Any failure produces one error notification.
    pub async fn load_initial_data(&mut self) {
        self.view.show_loading(true);

        let api = &self.api;
        let (overview, alerts, traffic, status, logs, sources) = tokio::join!(
            fetch_overview(api, self.config.overview_hours),
            fetch_alerts(api, self.alert_query(), self.chart_mode, self.config.type_sample),
            api.traffic_series(self.traffic_hours),
            fetch_status(api),
            api.system_logs(self.config.log_limit, self.log_level.as_ref().map(AsRef::as_ref)),
            api.top_sources(self.config.overview_hours, self.config.top_sources_limit),
        );

        let mut ok = self.apply_overview(overview);
        ok &= self.apply_alerts(alerts);
        ok &= self.apply_traffic(traffic);
        ok &= self.apply_status(status);
        ok &= self.apply_logs(logs);
        ok &= self.apply_top_sources(sources);

        if !ok {
            warn!("initial dashboard load was incomplete");
            self.view.notify(Notification::error(MSG_LOAD_FAILED));
        }
        self.view.show_loading(false);
    }

    /// The four metric cards and the status indicator.
    pub async fn load_overview(&mut self) {
        let batch = fetch_overview(&self.api, self.config.overview_hours).await;
        self.apply_overview(batch);
    }

    /// Alert table (current filters) and the distribution chart (current mode).
    pub async fn load_alerts(&mut self) {
        let batch = fetch_alerts(
            &self.api,
            self.alert_query(),
            self.chart_mode,
            self.config.type_sample,
        )
        .await;
        self.apply_alerts(batch);
    }

    /// Redraw the traffic chart over the last `hours`.
    pub async fn load_traffic_data(&mut self, hours: u32) {
        self.traffic_hours = hours;
        let series = self.api.traffic_series(hours).await;
        self.apply_traffic(series);
    }

    /// Component list and host metrics, rendered independently.
    pub async fn load_system_status(&mut self) {
        let batch = fetch_status(&self.api).await;
        self.apply_status(batch);
    }

    pub async fn load_system_logs(&mut self) {
        let logs = self
            .api
            .system_logs(self.config.log_limit, self.log_level.as_ref().map(AsRef::as_ref))
            .await;
        self.apply_logs(logs);
    }

    pub async fn load_top_sources(&mut self) {
        let sources = self
            .api
            .top_sources(self.config.overview_hours, self.config.top_sources_limit)
            .await;
        self.apply_top_sources(sources);
    }

    /// Background refresh: overview, alerts, and system status, then the
    /// last-update stamp. Failures are only logged.
    pub async fn refresh_cycle(&mut self) {
        debug!("refresh cycle");
        let api = &self.api;
        let (overview, alerts, status) = tokio::join!(
            fetch_overview(api, self.config.overview_hours),
            fetch_alerts(api, self.alert_query(), self.chart_mode, self.config.type_sample),
            fetch_status(api),
        );
        self.apply_overview(overview);
        self.apply_alerts(alerts);
        self.apply_status(status);
        self.view.set_last_update(Local::now());
    }

    // ── Alert detail & acknowledge ───────────────────────────────

    /// Fetch one alert, select it, and open the detail modal.
    pub async fn view_alert(&mut self, id: u64) {
        match self.api.get_alert(id).await {
            Ok(alert) => {
                self.view.open_alert_modal(AlertDetail::from(&alert));
                self.selected = Some(alert);
            }
            Err(e) => {
                warn!(id, error = %e, "failed to load alert details");
                self.view.notify(Notification::error(MSG_ALERT_DETAILS_FAILED));
            }
        }
    }

    pub fn close_alert_modal(&mut self) {
        self.view.close_alert_modal();
        self.selected = None;
    }

    /// Acknowledge the alert open in the detail modal. No-op without one.
    pub async fn acknowledge_alert(&mut self) {
        let Some(id) = self.selected.as_ref().map(|a| a.id) else {
            debug!("acknowledge requested with no alert selected");
            return;
        };
        self.acknowledge(id, true).await;
    }

    /// Acknowledge an alert straight from its table row.
    pub async fn acknowledge_alert_from_table(&mut self, id: u64) {
        self.acknowledge(id, false).await;
    }

    async fn acknowledge(&mut self, id: u64, from_modal: bool) {
        if let Err(e) = self.api.acknowledge_alert(id).await {
            warn!(id, error = %e, "failed to acknowledge alert");
            self.view.notify(Notification::error(MSG_ACK_FAILED));
            return;
        }
        info!(id, "alert acknowledged");

        if from_modal {
            self.close_alert_modal();
        }

        let api = &self.api;
        let (alerts, overview) = tokio::join!(
            fetch_alerts(api, self.alert_query(), self.chart_mode, self.config.type_sample),
            fetch_overview(api, self.config.overview_hours),
        );
        self.apply_alerts(alerts);
        self.apply_overview(overview);
        self.view.notify(Notification::success(MSG_ACK_OK));
    }

    // ── Charts ───────────────────────────────────────────────────

    /// Switch the distribution chart's projection and redraw it.
    pub async fn update_alerts_chart(&mut self, mode: ChartMode) {
        self.chart_mode = mode;
        let data = fetch_distribution(&self.api, mode, self.config.type_sample).await;
        match data {
            Ok(data) => self.set_chart(ChartCanvas::Alerts, data),
            Err(e) => warn!(%mode, error = %e, "failed to update alerts chart"),
        }
    }

    /// Open the enlarged chart modal with freshly fetched data.
    pub async fn show_chart_modal(&mut self, chart: ModalChart) {
        self.view.open_chart_modal(chart.title());

        if let Some(mut previous) = self.modal_chart.take() {
            debug!("destroying previous modal chart");
            previous.destroy();
        }
        self.modal_chart = Some(self.chart_factory.create(ChartCanvas::Modal, chart.kind()));

        let data = match chart {
            ModalChart::Traffic => self
                .api
                .traffic_series(MODAL_TRAFFIC_HOURS)
                .await
                .map(|points| ChartData::traffic(&points)),
            ModalChart::Alerts => {
                fetch_distribution(&self.api, self.chart_mode, self.config.type_sample).await
            }
        };

        match data {
            Ok(data) if data.is_empty() => debug!(%chart, "modal chart has no data"),
            Ok(data) => {
                if let Some(handle) = self.modal_chart.as_mut() {
                    handle.set_data(data.labels, data.series);
                }
            }
            Err(e) => warn!(%chart, error = %e, "failed to load modal chart"),
        }
    }

    /// Destroy the modal chart and restore scrolling.
    pub fn close_chart_modal(&mut self) {
        self.view.close_chart_modal();
        if let Some(mut chart) = self.modal_chart.take() {
            chart.destroy();
        }
    }

    // ── Apply ────────────────────────────────────────────────────

    fn apply_overview(&mut self, batch: OverviewBatch) -> bool {
        let mut ok = true;

        match batch.stats {
            Ok(stats) => self.view.render_overview_card(
                OverviewCard::ActiveAlerts,
                stats.by_status.active.to_string(),
            ),
            Err(e) => ok = log_failure("alert stats", &e),
        }
        match batch.network {
            Ok(net) => self.view.render_overview_card(
                OverviewCard::NetworkTraffic,
                format::format_bytes(net.total_bytes),
            ),
            Err(e) => ok = log_failure("network stats", &e),
        }
        match batch.anomalies {
            Ok(report) => self
                .view
                .render_overview_card(OverviewCard::Anomalies, report.count.to_string()),
            Err(e) => ok = log_failure("anomalies", &e),
        }
        match batch.health {
            Ok(health) => {
                let status = health.status.as_str();
                self.view
                    .render_overview_card(OverviewCard::SystemHealth, format::capitalize(status));
                self.view
                    .render_status_indicator(StatusIndicator::from_status(status));
            }
            Err(e) => ok = log_failure("system health", &e),
        }

        ok
    }

    fn apply_alerts(&mut self, batch: AlertsBatch) -> bool {
        let ok = match batch.alerts {
            Ok(alerts) => {
                let rows = alerts.iter().map(AlertRow::from).collect();
                self.view.render_alerts(Listing::new(rows, NO_ALERTS));
                true
            }
            Err(e) => log_failure("alerts", &e),
        };

        // The chart is secondary: its failure never fails the load.
        match batch.chart {
            Ok(data) => self.set_chart(ChartCanvas::Alerts, data),
            Err(e) => warn!(mode = %self.chart_mode, error = %e, "failed to update alerts chart"),
        }

        ok
    }

    fn apply_traffic(&mut self, series: ApiResult<Vec<TrafficPoint>>) -> bool {
        match series {
            Ok(points) if points.is_empty() => {
                debug!("empty traffic series, chart left as is");
                true
            }
            Ok(points) => {
                self.set_chart(ChartCanvas::Traffic, ChartData::traffic(&points));
                true
            }
            Err(e) => log_failure("traffic", &e),
        }
    }

    fn apply_status(&mut self, batch: StatusBatch) -> bool {
        let mut ok = true;

        match batch.components {
            Ok(components) => self
                .view
                .render_components(ComponentRow::from_components(&components)),
            Err(e) => ok = log_failure("components", &e),
        }
        match batch.health {
            Ok(HealthReport {
                system_metrics: Some(metrics),
                ..
            }) => self.view.render_metrics(MetricRow::from_metrics(&metrics)),
            Ok(_) => debug!("health report carried no system metrics"),
            Err(e) => ok = log_failure("system metrics", &e),
        }

        ok
    }

    fn apply_logs(&mut self, logs: ApiResult<Vec<LogEntry>>) -> bool {
        match logs {
            Ok(entries) => {
                let rows = entries.iter().map(LogRow::from).collect();
                self.view.render_logs(Listing::new(rows, NO_LOGS));
                true
            }
            Err(e) => log_failure("system logs", &e),
        }
    }

    fn apply_top_sources(&mut self, sources: ApiResult<Vec<TopSource>>) -> bool {
        match sources {
            Ok(sources) => {
                self.view
                    .render_top_sources(Listing::new(TopSourceRow::ranked(&sources), NO_SOURCES));
                true
            }
            Err(e) => log_failure("top sources", &e),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn alert_query(&self) -> AlertQuery {
        AlertQuery::new(self.config.alert_limit)
            .severity(self.filters.severity.clone())
            .status(self.filters.status.clone())
    }

    fn set_chart(&mut self, canvas: ChartCanvas, data: ChartData) {
        match self.charts.get_mut(&canvas) {
            Some(chart) => chart.set_data(data.labels, data.series),
            None => debug!(%canvas, "no chart bound to canvas"),
        }
    }

    fn ensure_summary_charts(&mut self) {
        for (canvas, kind) in [
            (ChartCanvas::Traffic, ChartKind::Line),
            (ChartCanvas::Alerts, ChartKind::Distribution),
        ] {
            if !self.charts.contains_key(&canvas) {
                let chart = self.chart_factory.create(canvas, kind);
                self.charts.insert(canvas, chart);
            }
        }
    }
}

// ── Fetches ──────────────────────────────────────────────────────

fn log_failure(what: &str, err: &netwatch_api::Error) -> bool {
    warn!(error = %err, status = ?err.status(), "failed to load {what}");
    false
}

async fn fetch_overview(api: &ApiClient, hours: u32) -> OverviewBatch {
    let (stats, network, anomalies, health) = tokio::join!(
        api.alert_stats(),
        api.network_stats(hours),
        api.network_anomalies(hours),
        api.health(),
    );
    OverviewBatch {
        stats,
        network,
        anomalies,
        health,
    }
}

async fn fetch_alerts(
    api: &ApiClient,
    query: AlertQuery,
    mode: ChartMode,
    sample: u32,
) -> AlertsBatch {
    let (alerts, chart) = tokio::join!(
        api.list_alerts(&query),
        fetch_distribution(api, mode, sample),
    );
    AlertsBatch { alerts, chart }
}

async fn fetch_status(api: &ApiClient) -> StatusBatch {
    let (components, health) = tokio::join!(api.components(), api.health());
    StatusBatch { components, health }
}

/// Alert distribution in `mode`. Both the summary chart and the chart
/// modal draw from here.
async fn fetch_distribution(
    api: &ApiClient,
    mode: ChartMode,
    sample: u32,
) -> ApiResult<ChartData> {
    match mode {
        ChartMode::Severity => {
            let stats = api.alert_stats().await?;
            Ok(ChartData::severity(&stats.by_severity))
        }
        ChartMode::Type => {
            let alerts = api.list_alerts(&AlertQuery::new(sample)).await?;
            Ok(ChartData::alert_types(&alerts))
        }
    }
}
