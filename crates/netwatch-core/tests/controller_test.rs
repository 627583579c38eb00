#![allow(clippy::unwrap_used)]
// Integration tests for `DashboardController` against a wiremock backend,
// with a recording view and chart factory standing in for a renderer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwatch_core::{
    AlertDetail, AlertRow, AlertStatus, ChartCanvas, ChartFactory, ChartHandle, ChartKind,
    ChartMode, ComponentRow, DashboardConfig, DashboardController, DashboardView, Listing,
    LogLevel, LogRow, MetricRow, ModalChart, Notification, OverviewCard, RefreshState,
    RefreshTick, Severity, StatusIndicator, TopSourceRow, UiEvent,
};

// ── Recording view ──────────────────────────────────────────────────

#[derive(Default)]
struct ViewLog {
    loading: Vec<bool>,
    cards: HashMap<OverviewCard, String>,
    indicator: Option<StatusIndicator>,
    alerts: Option<Listing<AlertRow>>,
    components: Vec<ComponentRow>,
    metrics: Vec<MetricRow>,
    logs: Option<Listing<LogRow>>,
    top_sources: Option<Listing<TopSourceRow>>,
    alert_modal: Option<AlertDetail>,
    chart_modal: Option<String>,
    notifications: Vec<Notification>,
    last_updates: usize,
}

#[derive(Clone, Default)]
struct RecordingView(Arc<Mutex<ViewLog>>);

impl RecordingView {
    fn log(&self) -> std::sync::MutexGuard<'_, ViewLog> {
        self.0.lock().unwrap()
    }
}

impl DashboardView for RecordingView {
    fn show_loading(&mut self, loading: bool) {
        self.log().loading.push(loading);
    }

    fn render_overview_card(&mut self, card: OverviewCard, value: String) {
        self.log().cards.insert(card, value);
    }

    fn render_status_indicator(&mut self, indicator: StatusIndicator) {
        self.log().indicator = Some(indicator);
    }

    fn render_alerts(&mut self, alerts: Listing<AlertRow>) {
        self.log().alerts = Some(alerts);
    }

    fn render_components(&mut self, components: Vec<ComponentRow>) {
        self.log().components = components;
    }

    fn render_metrics(&mut self, metrics: Vec<MetricRow>) {
        self.log().metrics = metrics;
    }

    fn render_logs(&mut self, logs: Listing<LogRow>) {
        self.log().logs = Some(logs);
    }

    fn render_top_sources(&mut self, sources: Listing<TopSourceRow>) {
        self.log().top_sources = Some(sources);
    }

    fn open_alert_modal(&mut self, detail: AlertDetail) {
        self.log().alert_modal = Some(detail);
    }

    fn close_alert_modal(&mut self) {
        self.log().alert_modal = None;
    }

    fn open_chart_modal(&mut self, title: &str) {
        self.log().chart_modal = Some(title.to_owned());
    }

    fn close_chart_modal(&mut self) {
        self.log().chart_modal = None;
    }

    fn notify(&mut self, notification: Notification) {
        self.log().notifications.push(notification);
    }

    fn set_last_update(&mut self, _at: DateTime<Local>) {
        self.log().last_updates += 1;
    }
}

// ── Recording charts ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum ChartEvent {
    Created(usize, ChartCanvas, ChartKind),
    Data(usize, Vec<String>, Vec<f64>),
    Destroyed(usize),
}

#[derive(Clone, Default)]
struct RecordingCharts(Arc<Mutex<Vec<ChartEvent>>>);

impl RecordingCharts {
    fn events(&self) -> Vec<ChartEvent> {
        self.0.lock().unwrap().clone()
    }

    fn canvas_of(&self, id: usize) -> Option<ChartCanvas> {
        self.events().iter().find_map(|e| match e {
            ChartEvent::Created(i, canvas, _) if *i == id => Some(*canvas),
            _ => None,
        })
    }

    /// Charts bound to `canvas` that were created and not yet destroyed.
    fn live(&self, canvas: ChartCanvas) -> usize {
        let events = self.events();
        let created: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                ChartEvent::Created(id, c, _) if *c == canvas => Some(*id),
                _ => None,
            })
            .collect();
        created
            .iter()
            .filter(|id| !events.contains(&ChartEvent::Destroyed(**id)))
            .count()
    }

    /// Most recent data pushed into a chart on `canvas`.
    fn last_data(&self, canvas: ChartCanvas) -> Option<(Vec<String>, Vec<f64>)> {
        self.events().into_iter().rev().find_map(|e| match e {
            ChartEvent::Data(id, labels, series) if self.canvas_of(id) == Some(canvas) => {
                Some((labels, series))
            }
            _ => None,
        })
    }
}

struct RecordingHandle {
    id: usize,
    events: Arc<Mutex<Vec<ChartEvent>>>,
}

impl ChartHandle for RecordingHandle {
    fn set_data(&mut self, labels: Vec<String>, series: Vec<f64>) {
        self.events
            .lock()
            .unwrap()
            .push(ChartEvent::Data(self.id, labels, series));
    }

    fn destroy(&mut self) {
        self.events.lock().unwrap().push(ChartEvent::Destroyed(self.id));
    }
}

impl ChartFactory for RecordingCharts {
    fn create(&mut self, canvas: ChartCanvas, kind: ChartKind) -> Box<dyn ChartHandle> {
        let mut events = self.0.lock().unwrap();
        let id = events
            .iter()
            .filter(|e| matches!(e, ChartEvent::Created(..)))
            .count();
        events.push(ChartEvent::Created(id, canvas, kind));
        Box::new(RecordingHandle {
            id,
            events: Arc::clone(&self.0),
        })
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn alert_json(id: u64, kind: &str, severity: &str, status: &str) -> Value {
    json!({
        "id": id,
        "timestamp": "2024-05-01T12:30:00",
        "type": kind,
        "source_ip": "192.168.1.50",
        "destination_ip": "10.0.0.1",
        "port": 22,
        "protocol": "TCP",
        "severity": severity,
        "description": "Suspicious activity",
        "status": status,
        "details": {"attempts": 40}
    })
}

fn default_alerts() -> Value {
    json!({
        "alerts": [
            alert_json(7, "Brute Force", "High", "Active"),
            alert_json(6, "DDoS", "Critical", "Acknowledged"),
            alert_json(5, "Brute Force", "Low", "Active"),
        ]
    })
}

async fn mount_get(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount every read endpoint, skipping the routes in `except`.
async fn mount_backend(server: &MockServer, except: &[&str]) {
    let routes: Vec<(&str, Value)> = vec![
        (
            "/api/alerts/stats",
            json!({"stats": {
                "by_status": {"active": 3, "acknowledged": 1, "resolved": 0},
                "by_severity": {"critical": 1, "high": 2, "medium": 3, "low": 4},
                "recent_24h": 4, "total": 10
            }}),
        ),
        ("/api/network/stats", json!({"stats": {"total_bytes": 1536}})),
        ("/api/network/anomalies", json!({"anomalies": [], "count": 2})),
        (
            "/api/status/health",
            json!({"health": {
                "status": "healthy",
                "system_metrics": {
                    "cpu_percent": 12.34, "memory_percent": 40.0, "disk_percent": 55.5,
                    "memory_available_gb": 7.5, "disk_free_gb": 120.0
                }
            }}),
        ),
        ("/api/alerts", default_alerts()),
        (
            "/api/network/traffic",
            json!({"traffic_data": [
                {"timestamp": "2024-05-01 10:00:00", "total_bytes": 1_048_576},
                {"timestamp": "2024-05-01 11:00:00", "total_bytes": 3_670_016}
            ]}),
        ),
        (
            "/api/status/components",
            json!({"components": {
                "detection_engine": {"status": "healthy"},
                "database": {"status": "warning"}
            }}),
        ),
        (
            "/api/status/logs",
            json!({"logs": [
                {"timestamp": "2024-05-01T12:00:00", "level": "INFO", "message": "second", "component": "api"},
                {"timestamp": "2024-05-01T11:00:00", "level": "ERROR", "message": "first", "component": "db"}
            ]}),
        ),
        (
            "/api/network/top-sources",
            json!({"top_sources": [
                {"source_ip": "10.0.0.8", "total_bytes": 2048, "total_packets": 9, "connection_count": 3}
            ]}),
        ),
    ];

    for (route, body) in routes {
        if !except.contains(&route) {
            mount_get(server, route, 200, body).await;
        }
    }

    Mock::given(method("GET"))
        .and(path("/api/alerts/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"alert": alert_json(7, "Brute Force", "High", "Active")})),
        )
        .mount(server)
        .await;
}

async fn mount_ack(server: &MockServer, status: u16) {
    Mock::given(method("PUT"))
        .and(path("/api/alerts/7/acknowledge"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({"success": status == 200})),
        )
        .mount(server)
        .await;
}

struct Harness {
    server: MockServer,
    view: RecordingView,
    charts: RecordingCharts,
}

impl Harness {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            view: RecordingView::default(),
            charts: RecordingCharts::default(),
        }
    }

    fn config(&self) -> DashboardConfig {
        DashboardConfig::new(Url::parse(&self.server.uri()).unwrap())
    }

    fn controller_with(&self, config: DashboardConfig) -> DashboardController {
        DashboardController::new(
            config,
            Box::new(self.view.clone()),
            Box::new(self.charts.clone()),
        )
        .unwrap()
    }

    fn controller(&self) -> DashboardController {
        self.controller_with(self.config())
    }

    /// Requests received for `route` (any method).
    async fn hits(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count()
    }

    /// Query string of the most recent request to `route`.
    async fn last_query(&self, route: &str) -> Vec<(String, String)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .rev()
            .find(|r| r.url.path() == route)
            .map(|r| r.url.query_pairs().into_owned().collect())
            .unwrap_or_default()
    }

    async fn total_requests(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ── Initial load ────────────────────────────────────────────────────

#[tokio::test]
async fn test_initial_load_renders_every_region() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;

    let mut ctrl = h.controller();
    ctrl.start().await;
    assert_eq!(ctrl.state(), RefreshState::Running);

    {
        let log = h.view.log();
        assert_eq!(log.loading, vec![true, false]);
        assert!(log.notifications.is_empty());

        assert_eq!(log.cards[&OverviewCard::ActiveAlerts], "3");
        assert_eq!(log.cards[&OverviewCard::NetworkTraffic], "1.5 KB");
        assert_eq!(log.cards[&OverviewCard::Anomalies], "2");
        assert_eq!(log.cards[&OverviewCard::SystemHealth], "Healthy");
        assert_eq!(log.indicator.as_ref().unwrap().text, "System Healthy");

        let alerts = log.alerts.as_ref().unwrap();
        assert_eq!(alerts.rendered_len(), 3);
        let classes: Vec<(&str, &str)> = alerts
            .rows()
            .iter()
            .map(|r| (r.severity_class.as_str(), r.status_class.as_str()))
            .collect();
        assert_eq!(
            classes,
            vec![
                ("severity-high", "status-active"),
                ("severity-critical", "status-acknowledged"),
                ("severity-low", "status-active"),
            ]
        );

        let names: Vec<&str> = log.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Detection Engine", "Database"]);
        assert_eq!(log.metrics[0].value, "12.3%");

        let messages: Vec<&str> = log
            .logs
            .as_ref()
            .unwrap()
            .rows()
            .iter()
            .map(|l| l.message.as_str())
            .collect();
        assert_eq!(messages, vec!["second", "first"]);

        let sources = log.top_sources.as_ref().unwrap();
        assert_eq!(sources.rows()[0].bytes, "2 KB");
    }

    let (labels, series) = h.charts.last_data(ChartCanvas::Alerts).unwrap();
    assert_eq!(labels, vec!["Critical", "High", "Medium", "Low"]);
    assert_eq!(series, vec![1.0, 2.0, 3.0, 4.0]);

    let (labels, series) = h.charts.last_data(ChartCanvas::Traffic).unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(series, vec![1.0, 3.5]);

    assert_eq!(h.hits("/api/network/traffic").await, 1);
    assert_eq!(
        h.last_query("/api/network/traffic").await,
        pairs(&[("hours", "24")])
    );
}

#[tokio::test]
async fn test_initial_load_failure_is_isolated_and_reported_once() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/network/traffic", "/api/status/logs"]).await;
    mount_get(&h.server, "/api/network/traffic", 500, json!({"error": "boom"})).await;
    mount_get(&h.server, "/api/status/logs", 503, json!({})).await;

    let mut ctrl = h.controller();
    ctrl.load_initial_data().await;

    let log = h.view.log();
    assert_eq!(
        log.notifications,
        vec![Notification::error("Failed to load dashboard data")]
    );
    assert_eq!(log.loading, vec![true, false]);
    assert_eq!(log.alerts.as_ref().unwrap().rendered_len(), 3);
    assert_eq!(log.cards.len(), 4);
    assert!(log.logs.is_none());
    drop(log);

    assert!(h.charts.last_data(ChartCanvas::Traffic).is_none());
}

#[tokio::test]
async fn test_overview_cards_render_independently() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/network/stats"]).await;
    mount_get(&h.server, "/api/network/stats", 500, json!({})).await;

    let mut ctrl = h.controller();
    ctrl.load_overview().await;

    let log = h.view.log();
    assert!(!log.cards.contains_key(&OverviewCard::NetworkTraffic));
    assert_eq!(log.cards[&OverviewCard::ActiveAlerts], "3");
    assert_eq!(log.cards[&OverviewCard::Anomalies], "2");
    assert_eq!(log.cards[&OverviewCard::SystemHealth], "Healthy");
    assert!(log.notifications.is_empty());
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_zero_alerts_render_one_placeholder_row() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/alerts"]).await;
    mount_get(&h.server, "/api/alerts", 200, json!({"alerts": []})).await;

    let mut ctrl = h.controller();
    ctrl.load_alerts().await;

    let log = h.view.log();
    let alerts = log.alerts.as_ref().unwrap();
    assert_eq!(alerts, &Listing::Placeholder("No alerts found"));
    assert_eq!(alerts.rendered_len(), 1);
}

#[tokio::test]
async fn test_filters_become_query_parameters() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.handle_event(UiEvent::SetSeverityFilter(Some(Severity::High)))
        .await;
    ctrl.handle_event(UiEvent::SetStatusFilter(Some(AlertStatus::Active)))
        .await;
    assert_eq!(
        h.last_query("/api/alerts").await,
        pairs(&[("limit", "50"), ("severity", "High"), ("status", "Active")])
    );

    ctrl.handle_event(UiEvent::SetSeverityFilter(None)).await;
    ctrl.handle_event(UiEvent::SetStatusFilter(None)).await;
    assert_eq!(h.last_query("/api/alerts").await, pairs(&[("limit", "50")]));
    assert_eq!(ctrl.filters().severity, None);
}

#[tokio::test]
async fn test_type_mode_tallies_recent_alerts() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.update_alerts_chart(ChartMode::Type).await;
    assert_eq!(ctrl.chart_mode(), ChartMode::Type);
    assert_eq!(h.last_query("/api/alerts").await, pairs(&[("limit", "100")]));

    let (labels, series) = h.charts.last_data(ChartCanvas::Alerts).unwrap();
    assert_eq!(labels, vec!["Brute Force", "DDoS"]);
    assert_eq!(series, vec![2.0, 1.0]);

    // Reloading the table keeps the selected projection.
    ctrl.load_alerts().await;
    let (labels, _) = h.charts.last_data(ChartCanvas::Alerts).unwrap();
    assert_eq!(labels, vec!["Brute Force", "DDoS"]);
}

// ── Alert detail & acknowledge ──────────────────────────────────────

#[tokio::test]
async fn test_view_alert_selects_and_opens_modal() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.handle_event(UiEvent::ViewAlert(7)).await;
    assert_eq!(ctrl.selected_alert().unwrap().id, 7);
    {
        let log = h.view.log();
        let detail = log.alert_modal.as_ref().unwrap();
        assert!(detail.can_acknowledge);
        assert_eq!(detail.port, "22");
        assert!(detail.details.as_ref().unwrap().contains("attempts"));
    }

    ctrl.handle_event(UiEvent::CloseAlertModal).await;
    assert!(ctrl.selected_alert().is_none());
    assert!(h.view.log().alert_modal.is_none());
}

#[tokio::test]
async fn test_view_alert_failure_notifies() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.view_alert(404).await;
    assert!(ctrl.selected_alert().is_none());
    assert_eq!(
        h.view.log().notifications,
        vec![Notification::error("Failed to load alert details")]
    );
}

#[tokio::test]
async fn test_acknowledge_refetches_list_and_overview() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    mount_ack(&h.server, 200).await;
    let mut ctrl = h.controller();

    ctrl.view_alert(7).await;
    let alerts_before = h.hits("/api/alerts").await;
    let stats_before = h.hits("/api/alerts/stats").await;
    let health_before = h.hits("/api/status/health").await;

    ctrl.acknowledge_alert().await;

    assert_eq!(h.hits("/api/alerts/7/acknowledge").await, 1);
    assert_eq!(h.hits("/api/alerts").await, alerts_before + 1);
    assert!(h.hits("/api/alerts/stats").await > stats_before);
    assert_eq!(h.hits("/api/status/health").await, health_before + 1);

    assert!(ctrl.selected_alert().is_none());
    let log = h.view.log();
    assert!(log.alert_modal.is_none());
    assert_eq!(
        log.notifications,
        vec![Notification::success("Alert acknowledged successfully")]
    );
    assert_eq!(log.alerts.as_ref().unwrap().rendered_len(), 3);
}

#[tokio::test]
async fn test_acknowledge_from_table() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    mount_ack(&h.server, 200).await;
    let mut ctrl = h.controller();
    let stats_before = h.hits("/api/alerts/stats").await;
    let health_before = h.hits("/api/status/health").await;

    ctrl.handle_event(UiEvent::AcknowledgeAlert(7)).await;

    assert_eq!(h.hits("/api/alerts/7/acknowledge").await, 1);
    assert_eq!(h.hits("/api/alerts").await, 1);
    assert!(h.hits("/api/alerts/stats").await > stats_before);
    assert_eq!(h.hits("/api/status/health").await, health_before + 1);
    assert_eq!(
        h.view.log().notifications,
        vec![Notification::success("Alert acknowledged successfully")]
    );
}

#[tokio::test]
async fn test_acknowledge_failure_leaves_state_untouched() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    mount_ack(&h.server, 500).await;
    let mut ctrl = h.controller();

    ctrl.view_alert(7).await;
    let alerts_before = h.hits("/api/alerts").await;

    ctrl.handle_event(UiEvent::AcknowledgeSelected).await;

    assert_eq!(ctrl.selected_alert().unwrap().id, 7);
    assert_eq!(h.hits("/api/alerts").await, alerts_before);
    let log = h.view.log();
    assert!(log.alert_modal.is_some());
    assert_eq!(
        log.notifications,
        vec![Notification::error("Failed to acknowledge alert")]
    );
}

#[tokio::test]
async fn test_acknowledge_without_selection_is_noop() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    mount_ack(&h.server, 200).await;
    let mut ctrl = h.controller();

    ctrl.acknowledge_alert().await;

    assert_eq!(h.total_requests().await, 0);
    assert!(h.view.log().notifications.is_empty());
}

// ── Charts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_chart_modal_reopen_keeps_one_live_chart() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.show_chart_modal(ModalChart::Traffic).await;
    ctrl.show_chart_modal(ModalChart::Traffic).await;

    assert_eq!(h.charts.live(ChartCanvas::Modal), 1);
    assert_eq!(
        h.view.log().chart_modal.as_deref(),
        Some("Network Traffic Overview")
    );

    // The first modal chart is destroyed before the second is created.
    let events = h.charts.events();
    let modal_ids: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            ChartEvent::Created(id, ChartCanvas::Modal, _) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(modal_ids.len(), 2);
    let destroyed_at = events
        .iter()
        .position(|e| *e == ChartEvent::Destroyed(modal_ids[0]))
        .unwrap();
    let second_created_at = events
        .iter()
        .position(|e| matches!(e, ChartEvent::Created(id, ..) if *id == modal_ids[1]))
        .unwrap();
    assert!(destroyed_at < second_created_at);

    let (_, series) = h.charts.last_data(ChartCanvas::Modal).unwrap();
    assert_eq!(series, vec![1.0, 3.5]);
    assert_eq!(
        h.last_query("/api/network/traffic").await,
        pairs(&[("hours", "24")])
    );

    ctrl.handle_event(UiEvent::CloseChartModal).await;
    assert_eq!(h.charts.live(ChartCanvas::Modal), 0);
    assert!(!ctrl.has_modal_chart());
    assert!(h.view.log().chart_modal.is_none());
}

#[tokio::test]
async fn test_alert_modal_chart_follows_current_mode() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.show_chart_modal(ModalChart::Alerts).await;
    let (labels, series) = h.charts.last_data(ChartCanvas::Modal).unwrap();
    assert_eq!(labels, vec!["Critical", "High", "Medium", "Low"]);
    assert_eq!(series, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(h.view.log().chart_modal.as_deref(), Some("Alert Distribution"));

    ctrl.update_alerts_chart(ChartMode::Type).await;
    ctrl.show_chart_modal(ModalChart::Alerts).await;
    let (labels, series) = h.charts.last_data(ChartCanvas::Modal).unwrap();
    assert_eq!(labels, vec!["Brute Force", "DDoS"]);
    assert_eq!(series, vec![2.0, 1.0]);
    assert_eq!(h.charts.live(ChartCanvas::Modal), 1);
}

#[tokio::test]
async fn test_empty_traffic_series_leaves_chart_untouched() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/network/traffic"]).await;
    mount_get(&h.server, "/api/network/traffic", 200, json!({"data": []})).await;
    let mut ctrl = h.controller();

    ctrl.handle_event(UiEvent::SetTrafficRange(6)).await;

    assert_eq!(ctrl.traffic_hours(), 6);
    assert_eq!(
        h.last_query("/api/network/traffic").await,
        pairs(&[("hours", "6")])
    );
    assert!(h.charts.last_data(ChartCanvas::Traffic).is_none());
}

#[tokio::test]
async fn test_shutdown_destroys_every_chart() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.start().await;
    ctrl.show_chart_modal(ModalChart::Alerts).await;
    ctrl.shutdown();

    assert_eq!(ctrl.state(), RefreshState::Stopped);
    for canvas in [ChartCanvas::Traffic, ChartCanvas::Alerts, ChartCanvas::Modal] {
        assert_eq!(h.charts.live(canvas), 0, "{canvas} still live");
    }
}

// ── System ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_log_level_filter() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.handle_event(UiEvent::SetLogLevel(Some(LogLevel::Error)))
        .await;
    assert_eq!(
        h.last_query("/api/status/logs").await,
        pairs(&[("limit", "20"), ("level", "ERROR")])
    );

    ctrl.handle_event(UiEvent::SetLogLevel(None)).await;
    assert_eq!(
        h.last_query("/api/status/logs").await,
        pairs(&[("limit", "20")])
    );
}

#[tokio::test]
async fn test_empty_logs_render_placeholder() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/status/logs"]).await;
    mount_get(&h.server, "/api/status/logs", 200, json!({"logs": []})).await;
    let mut ctrl = h.controller();

    ctrl.load_system_logs().await;
    assert_eq!(
        h.view.log().logs,
        Some(Listing::Placeholder("No logs available"))
    );
}

#[tokio::test]
async fn test_system_status_renders_parts_independently() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/status/components"]).await;
    mount_get(&h.server, "/api/status/components", 500, json!({})).await;
    let mut ctrl = h.controller();

    ctrl.load_system_status().await;

    let log = h.view.log();
    assert!(log.components.is_empty());
    assert_eq!(log.metrics.len(), 5);
    assert_eq!(log.metrics[4].value, "120 GB");
}

// ── Refresh lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_background_refresh_is_silent_on_failure() {
    let h = Harness::new().await;
    mount_backend(&h.server, &["/api/alerts/stats"]).await;
    mount_get(&h.server, "/api/alerts/stats", 500, json!({})).await;
    let mut ctrl = h.controller();

    ctrl.refresh_cycle().await;

    let log = h.view.log();
    assert!(log.notifications.is_empty());
    assert_eq!(log.last_updates, 1);
    assert_eq!(log.alerts.as_ref().unwrap().rendered_len(), 3);
}

#[tokio::test]
async fn test_refresh_cycle_skips_traffic_and_logs() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.refresh_cycle().await;

    assert_eq!(h.hits("/api/network/traffic").await, 0);
    assert_eq!(h.hits("/api/status/logs").await, 0);
    assert_eq!(h.hits("/api/status/components").await, 1);
    assert_eq!(h.hits("/api/network/anomalies").await, 1);
}

#[tokio::test]
async fn test_stale_tick_is_ignored() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    ctrl.handle_tick(RefreshTick { epoch: 42 }).await;

    assert_eq!(h.total_requests().await, 0);
    assert_eq!(h.view.log().last_updates, 0);
}

#[tokio::test]
async fn test_visibility_transitions() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let mut ctrl = h.controller();

    // Visibility changes before start do nothing.
    ctrl.set_visibility(false).await;
    assert_eq!(ctrl.state(), RefreshState::Stopped);

    ctrl.start().await;
    assert_eq!(h.hits("/api/status/logs").await, 1);

    ctrl.set_visibility(false).await;
    assert_eq!(ctrl.state(), RefreshState::Paused);
    ctrl.set_visibility(false).await;
    assert_eq!(ctrl.state(), RefreshState::Paused);

    ctrl.set_visibility(true).await;
    assert_eq!(ctrl.state(), RefreshState::Running);
    assert_eq!(h.hits("/api/status/logs").await, 2);

    ctrl.set_visibility(true).await;
    assert_eq!(h.hits("/api/status/logs").await, 2);
}

async fn wait_until<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_run_loop_pauses_while_hidden() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;

    let mut config = h.config();
    config.refresh_interval = Duration::from_millis(150);
    let ctrl = h.controller_with(config);

    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let task = tokio::spawn(ctrl.run(rx, cancel.clone()));

    let view = h.view.clone();
    wait_until("initial load", || view.log().loading.len() == 2).await;
    wait_until("a background refresh", || view.log().last_updates >= 1).await;

    tx.send(UiEvent::SetVisibility(false)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let hidden_at = h.total_requests().await;
    let updates_hidden = view.log().last_updates;

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(h.total_requests().await, hidden_at, "fetched while hidden");
    assert_eq!(view.log().last_updates, updates_hidden);

    tx.send(UiEvent::SetVisibility(true)).unwrap();
    wait_until("reload on show", || view.log().loading.len() == 4).await;
    assert_eq!(h.hits("/api/status/logs").await, 2);

    wait_until("cadence to resume", || {
        view.log().last_updates > updates_hidden
    })
    .await;
    // Background cycles never re-fetch logs; only the one reload did.
    assert_eq!(h.hits("/api/status/logs").await, 2);

    cancel.cancel();
    task.await.unwrap();
    assert_eq!(h.charts.live(ChartCanvas::Traffic), 0);
}

#[tokio::test]
async fn test_run_loop_dispatches_events_until_sender_drops() {
    let h = Harness::new().await;
    mount_backend(&h.server, &[]).await;
    let ctrl = h.controller();

    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(ctrl.run(rx, CancellationToken::new()));

    tx.send(UiEvent::ViewAlert(7)).unwrap();
    let view = h.view.clone();
    wait_until("alert modal", || view.log().alert_modal.is_some()).await;

    drop(tx);
    task.await.unwrap();
    assert_eq!(h.charts.live(ChartCanvas::Alerts), 0);
}
