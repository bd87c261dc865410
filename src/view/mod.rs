//! View module.
//!
//! The view is a capability the engine holds a reference to. Every region is
//! replaced wholesale by its writer, so interleaved writers never leave a
//! region half-updated.

mod logs;
mod notifications;
mod tree;

pub use logs::*;
pub use notifications::*;
pub use tree::*;

use crate::api::{ServiceState, StatusKey};

use chrono::{DateTime, Local};
use std::fmt;

/// Colour of an indicator or a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
    Gray,
}

impl From<ServiceState> for Color {
    fn from(state: ServiceState) -> Self {
        match state {
            ServiceState::Up => Color::Green,
            ServiceState::Down => Color::Red,
            ServiceState::Unknown => Color::Gray,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Green => "green",
            Color::Red => "red",
            Color::Gray => "gray",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

pub type NotificationId = u64;

/// One transient operator-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Local>,
}

/// One rendered row of the log table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
}

/// Operator controls that trigger backend actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlId {
    Restart(StatusKey),
    TriggerManual,
    RefreshStatus,
    ToggleLogs,
}

impl ControlId {
    /// Default affordance of the control.
    pub fn idle_label(&self) -> &'static str {
        match self {
            ControlId::Restart(_) => "Restart",
            ControlId::TriggerManual => "Trigger Manual Restart",
            ControlId::RefreshStatus => "Refresh Status",
            ControlId::ToggleLogs => "View All Logs",
        }
    }

    /// Affordance shown while the control's action is in flight.
    pub fn busy_label(&self) -> &'static str {
        match self {
            ControlId::Restart(_) => "Restarting...",
            ControlId::TriggerManual => "Triggering...",
            ControlId::RefreshStatus => "Refreshing...",
            ControlId::ToggleLogs => "Loading...",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::Restart(key) => write!(f, "restart[{}]", key),
            ControlId::TriggerManual => f.write_str("trigger-manual"),
            ControlId::RefreshStatus => f.write_str("refresh-status"),
            ControlId::ToggleLogs => f.write_str("toggle-logs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub enabled: bool,
    pub label: String,
}

impl ControlState {
    pub fn idle(control: &ControlId) -> Self {
        Self {
            enabled: true,
            label: control.idle_label().to_string(),
        }
    }

    pub fn busy(control: &ControlId) -> Self {
        Self {
            enabled: false,
            label: control.busy_label().to_string(),
        }
    }
}

/// Label of the log-view control once the panel is shown.
pub const HIDE_LOGS_LABEL: &str = "Hide Logs";

/// Render surface driven by the engine.
pub trait View: Send + Sync {
    /// Set the indicator for `key`, creating it on first sight.
    ///
    /// Returns false when no anchor exists for `key`.
    fn set_indicator(&self, key: &str, color: Color) -> bool;

    fn set_schedule_text(&self, text: String);

    /// Replace the down-service region: count, its colour and the names.
    fn set_down_services(&self, count: i64, color: Color, names: Vec<String>);

    fn set_log_count(&self, count: i64);

    /// Replace the whole log table body.
    fn replace_log_rows(&self, rows: Vec<LogEntry>);

    fn log_panel_visible(&self) -> bool;

    fn set_log_panel_visible(&self, visible: bool);

    fn set_control(&self, control: &ControlId, state: ControlState);

    fn push_notification(&self, notification: Notification);

    /// Returns false if the notification was already gone.
    fn remove_notification(&self, id: NotificationId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_state() {
        assert_eq!(Color::from(ServiceState::Up), Color::Green);
        assert_eq!(Color::from(ServiceState::Down), Color::Red);
        for raw in ["", "unknown", "error", "UP"] {
            assert_eq!(Color::from(ServiceState::from_raw(raw)), Color::Gray, "raw {raw:?}");
        }
    }

    #[test]
    fn test_control_labels() {
        let restart = ControlId::Restart("a|prod|web1|nginx".to_string());
        assert_eq!(ControlState::busy(&restart).label, "Restarting...");
        assert!(!ControlState::busy(&restart).enabled);
        assert_eq!(ControlState::idle(&ControlId::ToggleLogs).label, "View All Logs");
        assert_eq!(restart.to_string(), "restart[a|prod|web1|nginx]");
    }
}
