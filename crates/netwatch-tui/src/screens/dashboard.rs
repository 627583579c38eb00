//! The dashboard screen, the single view of the IDS backend.
//!
//! Layout:
//! ┌ header: status indicator, filters, last update ─────────────────┐
//! ├ Active Alerts ┬ Network Traffic ┬ Anomalies ┬ System Health ────┤
//! ├ Traffic chart ─────────────────┬ Alert distribution ────────────┤
//! ├ Alerts table ───────────────────────────────────────────────────┤
//! └ Components + metrics ─┬ Logs ──────────────┬ Top sources ───────┘
//!
//! Everything shown is pushed in by the controller as actions; keys turn
//! into `Action::Control` interactions and never mutate data locally.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap};
use strum::IntoEnumIterator;

use netwatch_core::{
    AlertDetail, AlertRow, ChartCanvas, ChartMode, ComponentRow, ControlId, Listing, LogRow,
    MetricRow, ModalChart, OverviewCard, StatusIndicator, TopSourceRow,
};

use crate::action::{Action, ChartId};
use crate::component::{Component, KeyHint};
use crate::theme;
use crate::widgets::chart::{self, ChartState};
use crate::widgets::modal;

const LOADING: &str = "Loading…";

/// Filter choices, cycled in order. The empty string clears the filter.
const SEVERITY_OPTIONS: [&str; 5] = ["", "Critical", "High", "Medium", "Low"];
const STATUS_OPTIONS: [&str; 4] = ["", "Active", "Acknowledged", "Resolved"];
const LOG_LEVEL_OPTIONS: [&str; 5] = ["", "DEBUG", "INFO", "WARNING", "ERROR"];
const TRAFFIC_RANGES: [u32; 4] = [1, 6, 24, 168];

pub struct DashboardScreen {
    loading: bool,
    cards: HashMap<OverviewCard, String>,
    indicator: Option<StatusIndicator>,
    alerts: Listing<AlertRow>,
    selected: usize,
    components: Vec<ComponentRow>,
    metrics: Vec<MetricRow>,
    logs: Listing<LogRow>,
    top_sources: Listing<TopSourceRow>,
    charts: HashMap<ChartId, ChartState>,
    alert_modal: Option<AlertDetail>,
    chart_modal: Option<String>,
    last_update: Option<DateTime<Local>>,

    // Local mirrors of the control selections, for cycling and display.
    severity: usize,
    status: usize,
    log_level: usize,
    traffic_hours: u32,
    chart_mode: ChartMode,
}

impl DashboardScreen {
    pub fn new(traffic_hours: u32) -> Self {
        Self {
            loading: false,
            cards: HashMap::new(),
            indicator: None,
            alerts: Listing::Placeholder(LOADING),
            selected: 0,
            components: Vec::new(),
            metrics: Vec::new(),
            logs: Listing::Placeholder(LOADING),
            top_sources: Listing::Placeholder(LOADING),
            charts: HashMap::new(),
            alert_modal: None,
            chart_modal: None,
            last_update: None,
            severity: 0,
            status: 0,
            log_level: 0,
            traffic_hours,
            chart_mode: ChartMode::default(),
        }
    }

    fn chart_on(&self, canvas: ChartCanvas) -> Option<&ChartState> {
        self.charts.values().find(|c| c.canvas == canvas)
    }

    fn selected_row(&self) -> Option<&AlertRow> {
        self.alerts.rows().get(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.alerts.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn cycle(index: &mut usize, len: usize) -> usize {
        *index = (*index + 1) % len;
        *index
    }

    fn next_traffic_range(&self) -> u32 {
        TRAFFIC_RANGES
            .iter()
            .copied()
            .find(|&h| h > self.traffic_hours)
            .unwrap_or(TRAFFIC_RANGES[0])
    }

    fn control(control: ControlId, value: Option<String>) -> Option<Action> {
        Some(Action::Control(control, value))
    }

    // ── Key handling ────────────────────────────────────────────────

    fn handle_alert_modal_key(key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('a') => Self::control(ControlId::Acknowledge, None),
            KeyCode::Esc | KeyCode::Char('c') => Self::control(ControlId::CloseAlertModal, None),
            _ => None,
        }
    }

    fn handle_chart_modal_key(key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') => Self::control(ControlId::CloseChartModal, None),
            _ => None,
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.alerts.rows().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => {
                let id = self.selected_row()?.id;
                Self::control(ControlId::ViewAlert, Some(id.to_string()))
            }
            KeyCode::Char('a') => {
                let row = self.selected_row().filter(|r| r.can_acknowledge)?;
                Self::control(ControlId::AcknowledgeRow, Some(row.id.to_string()))
            }
            KeyCode::Char('r') => Self::control(ControlId::RefreshAlerts, None),
            KeyCode::Char('s') => {
                let i = Self::cycle(&mut self.severity, SEVERITY_OPTIONS.len());
                Self::control(ControlId::SeverityFilter, Some(SEVERITY_OPTIONS[i].into()))
            }
            KeyCode::Char('f') => {
                let i = Self::cycle(&mut self.status, STATUS_OPTIONS.len());
                Self::control(ControlId::StatusFilter, Some(STATUS_OPTIONS[i].into()))
            }
            KeyCode::Char('l') => {
                let i = Self::cycle(&mut self.log_level, LOG_LEVEL_OPTIONS.len());
                Self::control(ControlId::LogLevel, Some(LOG_LEVEL_OPTIONS[i].into()))
            }
            KeyCode::Char('h') => {
                self.traffic_hours = self.next_traffic_range();
                Self::control(ControlId::TrafficRange, Some(self.traffic_hours.to_string()))
            }
            KeyCode::Char('m') => {
                self.chart_mode = match self.chart_mode {
                    ChartMode::Severity => ChartMode::Type,
                    ChartMode::Type => ChartMode::Severity,
                };
                Self::control(ControlId::ChartMode, Some(self.chart_mode.to_string()))
            }
            KeyCode::Char('t') => {
                Self::control(ControlId::OpenChartModal, Some(ModalChart::Traffic.to_string()))
            }
            KeyCode::Char('d') => {
                Self::control(ControlId::OpenChartModal, Some(ModalChart::Alerts.to_string()))
            }
            _ => None,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn panel(title: &str) -> Block<'_> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
    }

    fn filter_label(value: &str) -> &str {
        if value.is_empty() { "all" } else { value }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let indicator = self.indicator.as_ref().map_or_else(
            || Span::styled("○ connecting", theme::muted()),
            |ind| {
                Span::styled(
                    format!("● {}", ind.text),
                    Style::default()
                        .fg(theme::health_color(&ind.class))
                        .add_modifier(Modifier::BOLD),
                )
            },
        );

        let updated = self.last_update.map_or_else(
            || "never".to_owned(),
            |at| at.format("%H:%M:%S").to_string(),
        );

        let mut spans = vec![
            Span::styled(" netwatch ", theme::title_style()),
            indicator,
            Span::styled(
                format!(
                    "   severity: {}  status: {}  logs: {}  traffic: {}h  chart: {}",
                    Self::filter_label(SEVERITY_OPTIONS[self.severity]),
                    Self::filter_label(STATUS_OPTIONS[self.status]),
                    Self::filter_label(LOG_LEVEL_OPTIONS[self.log_level]),
                    self.traffic_hours,
                    self.chart_mode,
                ),
                theme::muted(),
            ),
            Span::styled(format!("   updated {updated}"), theme::muted()),
        ];
        if self.loading {
            spans.push(Span::styled(
                "   ◐ loading",
                Style::default().fg(theme::WARNING),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for (card, col) in OverviewCard::iter().zip(cols.iter()) {
            let value = self.cards.get(&card).map_or("─", String::as_str);
            let color = match card {
                OverviewCard::ActiveAlerts => theme::ALERT_ACTIVE,
                OverviewCard::NetworkTraffic => theme::HIGHLIGHT,
                OverviewCard::Anomalies => theme::WARNING,
                OverviewCard::SystemHealth => theme::health_color(&value.to_lowercase()),
            };
            let title = card.to_string();
            let block = Self::panel(&title);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    value.to_owned(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .block(block),
                *col,
            );
        }
    }

    fn render_alerts(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("Recent Alerts");

        let rows: Vec<Row> = match &self.alerts {
            Listing::Placeholder(message) => {
                vec![Row::new(vec![Cell::from(*message)]).style(theme::muted())]
            }
            Listing::Rows(alerts) => {
                let visible = usize::from(block.inner(area).height.saturating_sub(1)).max(1);
                let offset = self.selected.saturating_sub(visible - 1);
                alerts
                    .iter()
                    .enumerate()
                    .skip(offset)
                    .take(visible)
                    .map(|(i, a)| {
                        let style = if i == self.selected {
                            theme::table_selected()
                        } else {
                            theme::table_row()
                        };
                        let ack = if a.can_acknowledge { "[a]" } else { "" };
                        Row::new(vec![
                            Cell::from(a.timestamp.clone()),
                            Cell::from(a.alert_type.clone()),
                            Cell::from(a.source_ip.clone()),
                            Cell::from(a.destination_ip.clone()),
                            Cell::from(Span::styled(
                                a.severity.clone(),
                                Style::default().fg(theme::severity_color(&a.severity_class)),
                            )),
                            Cell::from(Span::styled(
                                a.status.clone(),
                                Style::default().fg(theme::status_color(&a.status_class)),
                            )),
                            Cell::from(a.description.clone()),
                            Cell::from(ack),
                        ])
                        .style(style)
                    })
                    .collect()
            }
        };

        let header = Row::new(vec![
            "Time",
            "Type",
            "Source",
            "Destination",
            "Severity",
            "Status",
            "Description",
            "",
        ])
        .style(theme::table_header());

        let widths = [
            Constraint::Length(24),
            Constraint::Length(16),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(9),
            Constraint::Length(13),
            Constraint::Min(20),
            Constraint::Length(3),
        ];

        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn render_system(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("System Status");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = self
            .components
            .iter()
            .map(|c| {
                let style = Style::default().fg(theme::health_color(&c.status));
                Line::from(vec![
                    Span::styled("● ", style),
                    Span::styled(format!("{:<20}", c.name), theme::table_row()),
                    Span::styled(c.status.clone(), style),
                ])
            })
            .collect();
        if !self.metrics.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(self.metrics.iter().map(|m| {
            Line::from(vec![
                Span::styled(format!("  {:<18}", m.name), theme::muted()),
                Span::styled(m.value.clone(), Style::default().fg(theme::HIGHLIGHT)),
            ])
        }));
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(LOADING, theme::muted())));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("System Logs");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = match &self.logs {
            Listing::Placeholder(message) => {
                vec![Line::from(Span::styled(*message, theme::muted()))]
            }
            Listing::Rows(logs) => logs
                .iter()
                .map(|l| {
                    let mut spans = vec![
                        Span::styled(format!("{} ", l.time), theme::muted()),
                        Span::styled(
                            format!("{:<7} ", l.level),
                            Style::default().fg(theme::log_level_color(&l.level_class)),
                        ),
                    ];
                    if let Some(component) = &l.component {
                        spans.push(Span::styled(format!("[{component}] "), theme::muted()));
                    }
                    spans.push(Span::styled(l.message.clone(), theme::table_row()));
                    Line::from(spans)
                })
                .collect(),
        };

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_top_sources(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("Top Sources");

        let rows: Vec<Row> = match &self.top_sources {
            Listing::Placeholder(message) => {
                vec![Row::new(vec![Cell::from(*message)]).style(theme::muted())]
            }
            Listing::Rows(sources) => sources
                .iter()
                .map(|s| {
                    Row::new(vec![
                        Cell::from(format!("{}.", s.rank)),
                        Cell::from(s.source_ip.clone()),
                        Cell::from(s.bytes.clone()),
                        Cell::from(s.connections.to_string()),
                    ])
                    .style(theme::table_row())
                })
                .collect(),
        };

        let widths = [
            Constraint::Length(3),
            Constraint::Min(15),
            Constraint::Length(10),
            Constraint::Length(6),
        ];
        let header = Row::new(vec!["#", "Source", "Bytes", "Conns"]).style(theme::table_header());

        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn render_alert_modal(frame: &mut Frame, area: Rect, detail: &AlertDetail) {
        let outer = modal::centered(area, 76, 22);
        let inner = modal::frame(frame, outer, &format!("Alert #{}", detail.id));

        let field = |name: &str, value: Span<'static>| {
            Line::from(vec![Span::styled(format!("  {name:<13}"), theme::muted()), value])
        };
        let plain = |v: &str| Span::styled(v.to_owned(), theme::table_row());

        let mut lines = vec![
            Line::from(""),
            field("Type", plain(&detail.alert_type)),
            field("Time", plain(&detail.timestamp)),
            field("Source", plain(&detail.source_ip)),
            field("Destination", plain(&detail.destination_ip)),
            field("Port", plain(&detail.port)),
            field("Protocol", plain(&detail.protocol)),
            field(
                "Severity",
                Span::styled(
                    detail.severity.clone(),
                    Style::default().fg(theme::severity_color(&detail.severity_class)),
                ),
            ),
            field(
                "Status",
                Span::styled(
                    detail.status.clone(),
                    Style::default().fg(theme::status_color(&detail.status_class)),
                ),
            ),
            field("Description", plain(&detail.description)),
        ];
        if let Some(details) = &detail.details {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("  Details", theme::title_style())));
            lines.extend(
                details
                    .lines()
                    .map(|l| Line::from(Span::styled(format!("  {l}"), theme::table_row()))),
            );
        }
        lines.push(Line::from(""));
        let mut hint = vec![Span::styled("  Esc ", theme::key())];
        hint.push(Span::styled("close", theme::muted()));
        if detail.can_acknowledge {
            hint.push(Span::styled("   a ", theme::key()));
            hint.push(Span::styled("acknowledge", theme::muted()));
        }
        lines.push(Line::from(hint));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_chart_modal(&self, frame: &mut Frame, area: Rect, title: &str) {
        let (width, height) = (area.width.saturating_sub(8), area.height.saturating_sub(4));
        let outer = modal::centered(area, width, height);
        let inner = modal::frame(frame, outer, title);
        chart::render(frame, inner, title, self.chart_on(ChartCanvas::Modal));
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = if self.alert_modal.is_some() {
            Self::handle_alert_modal_key(key)
        } else if self.chart_modal.is_some() {
            Self::handle_chart_modal_key(key)
        } else {
            self.handle_main_key(key)
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Loading(loading) => self.loading = *loading,
            Action::OverviewCard(card, value) => {
                self.cards.insert(*card, value.clone());
            }
            Action::StatusIndicator(indicator) => self.indicator = Some(indicator.clone()),
            Action::AlertsUpdated(alerts) => {
                self.alerts = alerts.clone();
                self.clamp_selection();
            }
            Action::ComponentsUpdated(components) => self.components.clone_from(components),
            Action::MetricsUpdated(metrics) => self.metrics.clone_from(metrics),
            Action::LogsUpdated(logs) => self.logs = logs.clone(),
            Action::TopSourcesUpdated(sources) => self.top_sources = sources.clone(),
            Action::OpenAlertModal(detail) => self.alert_modal = Some(detail.clone()),
            Action::CloseAlertModal => self.alert_modal = None,
            Action::OpenChartModal(title) => self.chart_modal = Some(title.clone()),
            Action::CloseChartModal => self.chart_modal = None,
            Action::LastUpdate(at) => self.last_update = Some(*at),
            Action::ChartCreated { id, canvas, kind } => {
                self.charts.insert(*id, ChartState::new(*canvas, *kind));
            }
            Action::ChartData { id, labels, series } => {
                if let Some(chart) = self.charts.get_mut(id) {
                    chart.set_data(labels.clone(), series.clone());
                }
            }
            Action::ChartDestroyed(id) => {
                self.charts.remove(id);
            }
            _ => {}
        }
        Ok(None)
    }

    fn key_hints(&self) -> Vec<KeyHint> {
        if let Some(detail) = &self.alert_modal {
            let mut hints = vec![("Esc", "close")];
            if detail.can_acknowledge {
                hints.push(("a", "acknowledge"));
            }
            return hints;
        }
        if self.chart_modal.is_some() {
            return vec![("Esc", "close")];
        }
        let mut hints = vec![("Enter", "details")];
        if self.selected_row().is_some_and(|r| r.can_acknowledge) {
            hints.push(("a", "ack"));
        }
        hints.extend([("s/f", "filter"), ("m", "chart mode"), ("t/d", "enlarge")]);
        hints
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(1),      // header
            Constraint::Length(3),      // cards
            Constraint::Percentage(35), // charts
            Constraint::Min(6),         // alerts
            Constraint::Length(10),     // system / logs / sources
        ])
        .split(area);

        self.render_header(frame, rows[0]);
        self.render_cards(frame, rows[1]);

        let charts = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        chart::render(
            frame,
            charts[0],
            &format!("Network Traffic ({}h, MB)", self.traffic_hours),
            self.chart_on(ChartCanvas::Traffic),
        );
        chart::render(
            frame,
            charts[1],
            &format!("Alerts by {}", self.chart_mode),
            self.chart_on(ChartCanvas::Alerts),
        );

        self.render_alerts(frame, rows[3]);

        let bottom = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .split(rows[4]);
        self.render_system(frame, bottom[0]);
        self.render_logs(frame, bottom[1]);
        self.render_top_sources(frame, bottom[2]);

        if let Some(title) = &self.chart_modal {
            self.render_chart_modal(frame, area, title);
        }
        if let Some(detail) = &self.alert_modal {
            Self::render_alert_modal(frame, area, detail);
        }
    }
}
