// ── UI event table ──
//
// Front-ends identify their controls by `ControlId` and report a raw
// value (a selection, an id, a flag). The `EventTable` maps each control
// to a parser that turns that value into a typed `UiEvent`, or rejects
// it. The table is built once; the controller only ever sees `UiEvent`s.

use std::collections::HashMap;
use std::str::FromStr;

use netwatch_api::{AlertStatus, Severity};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::chart::{ChartMode, ModalChart};

/// Backend log levels accepted by the log filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Every interactive control on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ControlId {
    RefreshAlerts,
    SeverityFilter,
    StatusFilter,
    TrafficRange,
    ChartMode,
    CloseAlertModal,
    Acknowledge,
    ViewAlert,
    AcknowledgeRow,
    OpenChartModal,
    CloseChartModal,
    LogLevel,
    Visibility,
}

/// A typed user intent for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    RefreshAlerts,
    /// `None` clears the filter.
    SetSeverityFilter(Option<Severity>),
    SetStatusFilter(Option<AlertStatus>),
    SetTrafficRange(u32),
    SetChartMode(ChartMode),
    CloseAlertModal,
    /// Acknowledge the alert open in the detail modal.
    AcknowledgeSelected,
    ViewAlert(u64),
    /// Acknowledge straight from a table row.
    AcknowledgeAlert(u64),
    OpenChartModal(ModalChart),
    CloseChartModal,
    SetLogLevel(Option<LogLevel>),
    SetVisibility(bool),
}

type Handler = fn(Option<&str>) -> Option<UiEvent>;

/// Declarative control → event mapping.
pub struct EventTable {
    handlers: HashMap<ControlId, Handler>,
}

impl EventTable {
    pub fn new() -> Self {
        let handlers = ControlId::iter()
            .map(|control| (control, handler_for(control)))
            .collect();
        Self { handlers }
    }

    /// Translate a control interaction into an event.
    ///
    /// Returns `None` when the value is missing or invalid for the control.
    pub fn dispatch(&self, control: ControlId, value: Option<&str>) -> Option<UiEvent> {
        let handler = self.handlers.get(&control)?;
        handler(value)
    }

    /// Same as [`dispatch`](Self::dispatch), addressing the control by name.
    pub fn dispatch_named(&self, control: &str, value: Option<&str>) -> Option<UiEvent> {
        let control = ControlId::from_str(control).ok()?;
        self.dispatch(control, value)
    }

    pub fn controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.handlers.keys().copied()
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::new()
    }
}

fn handler_for(control: ControlId) -> Handler {
    match control {
        ControlId::RefreshAlerts => |_| Some(UiEvent::RefreshAlerts),
        ControlId::SeverityFilter => |v| severity_filter(v).map(UiEvent::SetSeverityFilter),
        ControlId::StatusFilter => |v| status_filter(v).map(UiEvent::SetStatusFilter),
        ControlId::TrafficRange => |v| {
            parse_trimmed::<u32>(v)
                .filter(|hours| *hours > 0)
                .map(UiEvent::SetTrafficRange)
        },
        ControlId::ChartMode => |v| parse_trimmed::<ChartMode>(v).map(UiEvent::SetChartMode),
        ControlId::CloseAlertModal => |_| Some(UiEvent::CloseAlertModal),
        ControlId::Acknowledge => |_| Some(UiEvent::AcknowledgeSelected),
        ControlId::ViewAlert => |v| parse_trimmed::<u64>(v).map(UiEvent::ViewAlert),
        ControlId::AcknowledgeRow => |v| parse_trimmed::<u64>(v).map(UiEvent::AcknowledgeAlert),
        ControlId::OpenChartModal => {
            |v| parse_trimmed::<ModalChart>(v).map(UiEvent::OpenChartModal)
        }
        ControlId::CloseChartModal => |_| Some(UiEvent::CloseChartModal),
        ControlId::LogLevel => |v| optional(v, LogLevel::from_str).map(UiEvent::SetLogLevel),
        ControlId::Visibility => |v| match v?.trim() {
            "visible" | "true" => Some(UiEvent::SetVisibility(true)),
            "hidden" | "false" => Some(UiEvent::SetVisibility(false)),
            _ => None,
        },
    }
}

fn parse_trimmed<T: FromStr>(value: Option<&str>) -> Option<T> {
    value?.trim().parse().ok()
}

/// Empty selection means "any"; anything else must parse.
fn optional<T, E>(value: Option<&str>, parse: fn(&str) -> Result<T, E>) -> Option<Option<T>> {
    match value.map(str::trim) {
        None | Some("") => Some(None),
        Some(raw) => parse(raw).ok().map(Some),
    }
}

fn severity_filter(value: Option<&str>) -> Option<Option<Severity>> {
    optional(value, |raw| match Severity::from(raw.to_owned()) {
        Severity::Other(_) => Err(()),
        known => Ok(known),
    })
}

fn status_filter(value: Option<&str>) -> Option<Option<AlertStatus>> {
    optional(value, |raw| match AlertStatus::from(raw.to_owned()) {
        AlertStatus::Other(_) => Err(()),
        known => Ok(known),
    })
}
