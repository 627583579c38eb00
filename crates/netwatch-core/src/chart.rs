// ── Chart abstraction ──
//
// The controller never talks to a drawing backend directly. It asks a
// `ChartFactory` for a handle bound to a canvas, pushes labels and one
// series of values into it, and destroys it when the canvas goes away.

use indexmap::IndexMap;
use netwatch_api::{Alert, Severity, SeverityCounts, TrafficPoint};
use strum::{AsRefStr, Display, EnumString};

use crate::format;

/// A fixed drawing surface a chart can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ChartCanvas {
    Traffic,
    Alerts,
    Modal,
}

/// How a chart draws its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChartKind {
    /// Time series (traffic in MB per bucket).
    Line,
    /// Share-of-total distribution (alerts per bucket).
    Distribution,
}

/// Projection used by the alert distribution chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ChartMode {
    /// Counts per severity bucket from the stats endpoint.
    #[default]
    Severity,
    /// Tally of the `type` field over recent alerts.
    Type,
}

/// Which summary chart the detail modal enlarges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ModalChart {
    Traffic,
    Alerts,
}

impl ModalChart {
    pub fn title(self) -> &'static str {
        match self {
            Self::Traffic => "Network Traffic Overview",
            Self::Alerts => "Alert Distribution",
        }
    }

    pub fn kind(self) -> ChartKind {
        match self {
            Self::Traffic => ChartKind::Line,
            Self::Alerts => ChartKind::Distribution,
        }
    }
}

/// Labels and one aligned series of values, ready for `set_data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<f64>,
}

impl ChartData {
    /// Severity buckets, most severe first.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn severity(counts: &SeverityCounts) -> Self {
        Self {
            labels: Severity::BUCKETS.iter().map(ToString::to_string).collect(),
            series: counts.ordered().iter().map(|&n| n as f64).collect(),
        }
    }

    /// Tally of alert types in first-seen order.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn alert_types(alerts: &[Alert]) -> Self {
        let mut tally: IndexMap<&str, u64> = IndexMap::new();
        for alert in alerts {
            *tally.entry(alert.alert_type.as_str()).or_default() += 1;
        }
        Self {
            labels: tally.keys().map(|&t| t.to_owned()).collect(),
            series: tally.values().map(|&n| n as f64).collect(),
        }
    }

    /// `HH:MM` labels against traffic in MB.
    pub fn traffic(points: &[TrafficPoint]) -> Self {
        Self {
            labels: points
                .iter()
                .map(|p| format::format_hour_label(p.timestamp.as_ref()))
                .collect(),
            series: points.iter().map(|p| format::bytes_to_mb(p.total_bytes)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A live chart bound to one canvas.
pub trait ChartHandle: Send {
    /// Replace the chart's labels and values.
    fn set_data(&mut self, labels: Vec<String>, series: Vec<f64>);

    /// Release the canvas. The handle is not used again afterwards.
    fn destroy(&mut self);
}

/// Creates chart handles. Callers destroy any previous handle bound to
/// the same canvas before asking for a new one.
pub trait ChartFactory: Send {
    fn create(&mut self, canvas: ChartCanvas, kind: ChartKind) -> Box<dyn ChartHandle>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use netwatch_api::AlertStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    fn alert(kind: &str) -> Alert {
        Alert {
            id: 1,
            timestamp: None,
            alert_type: kind.into(),
            source_ip: "10.0.0.2".into(),
            destination_ip: "10.0.0.1".into(),
            port: None,
            protocol: None,
            severity: Severity::Low,
            status: AlertStatus::Active,
            description: String::new(),
            details: None,
        }
    }

    #[test]
    fn severity_distribution_keeps_bucket_order() {
        let data = ChartData::severity(&SeverityCounts {
            critical: 1,
            high: 2,
            medium: 3,
            low: 4,
        });
        assert_eq!(data.labels, vec!["Critical", "High", "Medium", "Low"]);
        assert_eq!(data.series, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn type_tally_in_first_seen_order() {
        let alerts: Vec<Alert> = ["DDoS", "Port Scan", "DDoS", "Brute Force", "DDoS"]
            .into_iter()
            .map(alert)
            .collect();
        let data = ChartData::alert_types(&alerts);
        assert_eq!(data.labels, vec!["DDoS", "Port Scan", "Brute Force"]);
        assert_eq!(data.series, vec![3.0, 1.0, 1.0]);
    }

    #[test]
    fn traffic_in_megabytes() {
        let points = vec![
            TrafficPoint {
                timestamp: None,
                total_bytes: 1_048_576,
                bytes_sent: 0,
                bytes_received: 0,
                packet_count: 0,
                connection_count: 0,
            },
            TrafficPoint {
                timestamp: None,
                total_bytes: 3_670_016,
                bytes_sent: 0,
                bytes_received: 0,
                packet_count: 0,
                connection_count: 0,
            },
        ];
        let data = ChartData::traffic(&points);
        assert_eq!(data.series, vec![1.0, 3.5]);
        assert_eq!(data.labels.len(), 2);
        assert!(ChartData::traffic(&[]).is_empty());
    }

    #[test]
    fn chart_mode_parses_control_values() {
        assert_eq!(ChartMode::from_str("severity").unwrap(), ChartMode::Severity);
        assert_eq!(ChartMode::from_str("type").unwrap(), ChartMode::Type);
        assert!(ChartMode::from_str("pie").is_err());
        assert_eq!(ChartMode::default(), ChartMode::Severity);
    }

    #[test]
    fn modal_titles() {
        let traffic = ModalChart::from_str("traffic").unwrap();
        assert_eq!(traffic.title(), "Network Traffic Overview");
        assert_eq!(traffic.kind(), ChartKind::Line);
        assert_eq!(ModalChart::Alerts.title(), "Alert Distribution");
    }

    #[test]
    fn canvas_names() {
        assert_eq!(ChartCanvas::Modal.as_ref(), "modal");
        assert_eq!(ChartCanvas::Traffic.to_string(), "traffic");
    }
}
