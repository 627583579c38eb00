//! Colors and styles for the dashboard.
//!
//! View models carry CSS-like class names (`severity-high`, `status-active`,
//! `log-error`, raw health status); this module maps them onto colors.

use ratatui::style::{Color, Modifier, Style};

// ── Palette, named by what it signals ─────────────────────────────────

pub const CRITICAL: Color = Color::Rgb(255, 99, 99);
pub const HIGH: Color = Color::Rgb(255, 184, 108);
pub const WARNING: Color = Color::Rgb(241, 250, 140);
pub const HEALTHY: Color = Color::Rgb(80, 250, 123);
pub const ALERT_ACTIVE: Color = Color::Rgb(255, 106, 193);
pub const ACKNOWLEDGED: Color = Color::Rgb(139, 233, 253);

pub const ACCENT: Color = Color::Rgb(225, 53, 255);
pub const HIGHLIGHT: Color = Color::Rgb(128, 255, 234);
pub const TEXT: Color = Color::Rgb(189, 193, 207);
pub const MUTED: Color = Color::Rgb(98, 114, 164);
pub const BG_SELECTED: Color = Color::Rgb(40, 42, 54);
pub const BG_OVERLAY: Color = Color::Rgb(30, 31, 41);

/// Bar colors for distribution charts, in bucket order. The first four
/// line up with Critical, High, Medium, Low.
pub const CHART_SERIES: &[Color] = &[
    CRITICAL,
    HIGH,
    WARNING,
    HEALTHY,
    HIGHLIGHT,
    ALERT_ACTIVE,
    ACCENT,
    ACKNOWLEDGED,
];

// ── Class → color ─────────────────────────────────────────────────────

pub fn severity_color(class: &str) -> Color {
    match class.strip_prefix("severity-").unwrap_or(class) {
        "critical" => CRITICAL,
        "high" => HIGH,
        "medium" => WARNING,
        "low" => HEALTHY,
        _ => TEXT,
    }
}

pub fn status_color(class: &str) -> Color {
    match class.strip_prefix("status-").unwrap_or(class) {
        "active" => ALERT_ACTIVE,
        "acknowledged" => ACKNOWLEDGED,
        "resolved" => HEALTHY,
        _ => TEXT,
    }
}

/// Raw health status of the system or one component.
pub fn health_color(status: &str) -> Color {
    match status {
        "healthy" => HEALTHY,
        "warning" | "degraded" => WARNING,
        "error" | "critical" | "unhealthy" => CRITICAL,
        _ => TEXT,
    }
}

pub fn log_level_color(class: &str) -> Color {
    match class.strip_prefix("log-").unwrap_or(class) {
        "error" | "critical" => CRITICAL,
        "warning" => WARNING,
        "info" => HIGHLIGHT,
        _ => MUTED,
    }
}

// ── Styles ────────────────────────────────────────────────────────────

/// Panel and modal titles.
pub fn title_style() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    title_style().add_modifier(Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

/// Placeholder rows, hint text, axis labels.
pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

/// The key half of a key hint.
pub fn key() -> Style {
    title_style()
}
