//! Display formatting shared by every renderer.
//!
//! These functions turn wire values into the exact strings the dashboard
//! shows, so the terminal front-end and the tests agree on one rendering.

use chrono::{DateTime, Local, TimeZone, Utc};
use netwatch_api::{AlertStatus, Severity};

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Shown wherever a timestamp is missing or unparseable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Descriptions longer than this are cut in the alert table.
pub const DESCRIPTION_LIMIT: usize = 50;

/// Human-readable byte count in binary units.
///
/// Scales to the largest unit where the magnitude stays below 1024, rounds
/// to two decimals and drops trailing zeros: `1536` → `"1.5 KB"`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", round2(value), BYTE_UNITS[unit])
}

/// Bytes expressed in MB, rounded to two decimals (traffic chart values).
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Alert timestamp in the viewer's local time, e.g. `May 1, 2024, 02:30 PM`.
pub fn format_datetime(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map_or_else(|| NOT_AVAILABLE.into(), |ts| format_datetime_in(ts, &Local))
}

pub(crate) fn format_datetime_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp
        .with_timezone(tz)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

/// `HH:MM` axis label for a traffic bucket, in local time.
pub fn format_hour_label(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || NOT_AVAILABLE.into(),
        |ts| ts.with_timezone(&Local).format("%H:%M").to_string(),
    )
}

/// Cut `text` to [`DESCRIPTION_LIMIT`] characters, marking the cut with `...`.
pub fn truncate_description(text: &str) -> String {
    truncate(text, DESCRIPTION_LIMIT)
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Style class for a severity, derived from the raw value: `severity-high`.
pub fn severity_class(severity: &Severity) -> String {
    format!("severity-{}", severity.as_str().to_lowercase())
}

/// Style class for a status, derived from the raw value: `status-active`.
pub fn status_class(status: &AlertStatus) -> String {
    format!("status-{}", status.as_str().to_lowercase())
}

/// `"detection_engine"` → `"Detection Engine"`.
pub fn component_display_name(raw: &str) -> String {
    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character, leave the rest alone.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_gb(value: f64) -> String {
    format!("{value} GB")
}
