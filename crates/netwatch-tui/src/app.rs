//! Application core: event loop, action dispatch, controller hand-off.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use netwatch_core::{ControlId, DashboardConfig, EventTable, Notification, NotificationKind};

use crate::action::Action;
use crate::bridge::ControllerTask;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::modal;

/// How long a notification toast stays in the status bar.
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Top-level application state and event loop.
pub struct App {
    config: DashboardConfig,
    screen: DashboardScreen,
    events: EventTable,
    running: bool,
    help_visible: bool,
    toast: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: DashboardConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screen = DashboardScreen::new(config.traffic_hours);

        Self {
            config,
            screen,
            events: EventTable::new(),
            running: true,
            help_visible: false,
            toast: None,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let controller = ControllerTask::spawn(self.config.clone(), &self.action_tx)?;

        let mut tui = Tui::enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(50),  // 20 FPS render
        );

        info!(api_url = %self.config.api_url, "dashboard event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Visibility(visible) => Some(visibility(visible)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action, &controller)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        controller.shutdown().await;
        info!("dashboard event loop ended");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action, controller: &ControllerTask) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Control(control, value) => {
                match self.events.dispatch(*control, value.as_deref()) {
                    Some(event) => {
                        if controller.events.send(event).is_err() {
                            warn!(%control, "controller is gone, dropping event");
                        }
                    }
                    None => debug!(%control, ?value, "control produced no event"),
                }
            }

            Action::Notify(notification) => {
                self.toast = Some((notification.clone(), Instant::now()));
            }

            Action::Tick => {
                if self.toast.as_ref().is_some_and(|(_, at)| at.elapsed() >= TOAST_TTL) {
                    self.toast = None;
                }
            }

            Action::Render | Action::Resize(..) => {}

            other => {
                if let Some(follow_up) = self.screen.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(self.config.api_url.as_str().to_owned(), theme::muted()),
            Span::styled(" │", theme::muted()),
        ];
        let hints = self.screen.key_hints();
        for (key, what) in hints.into_iter().chain([("?", "help"), ("q", "quit")]) {
            spans.push(Span::styled(format!(" {key} "), theme::key()));
            spans.push(Span::styled(what, theme::muted()));
        }

        if let Some((notification, _)) = &self.toast {
            let color = match notification.kind {
                NotificationKind::Success => theme::HEALTHY,
                NotificationKind::Error => theme::CRITICAL,
            };
            spans.push(Span::styled(
                format!("   {}", notification.message),
                Style::default().fg(color),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let outer = modal::centered(area, 60, 24);
        let inner = modal::frame(frame, outer, "Keyboard Shortcuts");

        let section = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::HIGHLIGHT),
                )),
                Line::from(Span::styled(
                    format!("  {}", "─".repeat(title.chars().count())),
                    theme::muted(),
                )),
            ]
        };
        let entry = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key()),
                Span::styled(what, theme::muted()),
            ])
        };

        let mut lines = vec![Line::from("")];
        lines.extend(section("Alerts"));
        lines.extend([
            entry("j/k ↑/↓", "Move selection"),
            entry("Enter", "Alert details"),
            entry("a", "Acknowledge alert"),
            entry("r", "Refresh alerts"),
            entry("s", "Cycle severity filter"),
            entry("f", "Cycle status filter"),
            Line::from(""),
        ]);
        lines.extend(section("Charts"));
        lines.extend([
            entry("h", "Cycle traffic window"),
            entry("m", "Severity / type distribution"),
            entry("t", "Enlarge traffic chart"),
            entry("d", "Enlarge alert distribution"),
            entry("Esc", "Close dialog"),
            Line::from(""),
        ]);
        lines.extend(section("Global"));
        lines.extend([
            entry("l", "Cycle log level"),
            entry("?", "This help"),
            entry("q", "Quit"),
        ]);

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn visibility(visible: bool) -> Action {
    let state = if visible { "visible" } else { "hidden" };
    Action::Control(ControlId::Visibility, Some(state.to_owned()))
}
