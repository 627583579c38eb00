//! Terminal rendering for controller-owned charts.
//!
//! A [`ChartState`] is the TUI-side mirror of one chart handle: the canvas
//! and kind it was created with plus the last labels/series pushed into
//! it. Line charts draw as a braille trend; distributions as bars.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
    Paragraph,
};

use netwatch_core::{ChartCanvas, ChartKind};

use crate::theme;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub canvas: ChartCanvas,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<f64>,
}

impl ChartState {
    pub fn new(canvas: ChartCanvas, kind: ChartKind) -> Self {
        Self {
            canvas,
            kind,
            labels: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn set_data(&mut self, labels: Vec<String>, series: Vec<f64>) {
        self.labels = labels;
        self.series = series;
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

/// Render `chart` inside a titled panel. Missing or empty charts show a
/// waiting message instead.
pub fn render(frame: &mut Frame, area: Rect, title: &str, chart: Option<&ChartState>) {
    let block = panel(title);
    match chart {
        Some(chart) if !chart.series.is_empty() => match chart.kind {
            ChartKind::Line => render_line(frame, area, block, chart),
            ChartKind::Distribution => render_distribution(frame, area, block, chart),
        },
        _ => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  Waiting for data…").style(theme::muted()),
                inner,
            );
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn render_line(frame: &mut Frame, area: Rect, block: Block<'_>, chart: &ChartState) {
    let points: Vec<(f64, f64)> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);
    let y_max = chart.series.iter().copied().fold(0.0_f64, f64::max).max(1.0) * 1.1;

    let first = chart.labels.first().cloned().unwrap_or_default();
    let last = chart.labels.last().cloned().unwrap_or_default();

    let dataset = Dataset::default()
        .name("MB")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme::HIGHLIGHT))
        .data(&points);

    let axis_style = theme::muted();
    let widget = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::styled(first, axis_style), Span::styled(last, axis_style)])
                .style(axis_style),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", axis_style),
                    Span::styled(format!("{:.1}", y_max / 2.0), axis_style),
                    Span::styled(format!("{y_max:.1}"), axis_style),
                ])
                .style(axis_style),
        );

    frame.render_widget(widget, area);
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn render_distribution(frame: &mut Frame, area: Rect, block: Block<'_>, chart: &ChartState) {
    let total: f64 = chart.series.iter().sum();

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(&chart.series)
        .enumerate()
        .map(|(i, (label, &value))| {
            let color = theme::CHART_SERIES[i % theme::CHART_SERIES.len()];
            let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
            Bar::default()
                .value(value.max(0.0).round() as u64)
                .label(Line::from(label.clone()))
                .text_value(format!("{value} ({share:.0}%)"))
                .style(Style::default().fg(color))
        })
        .collect();

    let inner_width = block.inner(area).width;
    let count = u16::try_from(bars.len().max(1)).unwrap_or(u16::MAX);
    let bar_width = (inner_width / count).saturating_sub(1).clamp(3, 16);

    let widget = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(widget, area);
}
