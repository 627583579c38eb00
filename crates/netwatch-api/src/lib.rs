// netwatch-api: Async Rust client for the netwatch IDS backend API

pub mod alerts;
pub mod client;
pub mod error;
pub mod models;
pub mod network;
pub mod system;
pub mod transport;

pub use alerts::AlertQuery;
pub use client::ApiClient;
pub use error::Error;
pub use models::{
    Alert, AlertStats, AlertStatus, AnomalyReport, ComponentInfo, HealthReport, HealthStatus,
    LogEntry, NetworkStats, Severity, SeverityCounts, StatusCounts, SystemMetrics, TopSource,
    TrafficPoint,
};
pub use transport::TransportConfig;
