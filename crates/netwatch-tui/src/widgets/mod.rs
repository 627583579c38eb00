pub mod chart;
pub mod modal;
