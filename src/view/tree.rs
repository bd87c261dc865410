//! In-process render tree.

use super::{Color, ControlId, ControlState, LogEntry, Notification, NotificationId, Severity, View};
use crate::api::StatusKey;

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownServices {
    pub count: Option<i64>,
    pub color: Option<Color>,
    pub names: Vec<String>,
}

/// View regions held in memory, each behind its own lock.
///
/// Indicator anchors are fixed at construction; an anchor's indicator is
/// `None` until the first poll that mentions it.
pub struct RenderTree {
    indicators: Mutex<BTreeMap<StatusKey, Option<Color>>>,
    schedule_text: Mutex<Option<String>>,
    down_services: Mutex<DownServices>,
    log_count: Mutex<Option<i64>>,
    log_rows: Mutex<Vec<LogEntry>>,
    log_panel_visible: Mutex<bool>,
    controls: Mutex<HashMap<ControlId, ControlState>>,
    notifications: Mutex<Vec<Notification>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RenderTree {
    pub fn new<I>(anchors: I) -> Self
    where
        I: IntoIterator<Item = StatusKey>,
    {
        Self {
            indicators: Mutex::new(anchors.into_iter().map(|key| (key, None)).collect()),
            schedule_text: Mutex::new(None),
            down_services: Mutex::new(DownServices::default()),
            log_count: Mutex::new(None),
            log_rows: Mutex::new(Vec::new()),
            log_panel_visible: Mutex::new(false),
            controls: Mutex::new(HashMap::new()),
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn indicator(&self, key: &str) -> Option<Color> {
        lock(&self.indicators).get(key).copied().flatten()
    }

    pub fn schedule_text(&self) -> Option<String> {
        lock(&self.schedule_text).clone()
    }

    pub fn down_services(&self) -> DownServices {
        lock(&self.down_services).clone()
    }

    pub fn log_count(&self) -> Option<i64> {
        *lock(&self.log_count)
    }

    pub fn log_rows(&self) -> Vec<LogEntry> {
        lock(&self.log_rows).clone()
    }

    pub fn control(&self, control: &ControlId) -> Option<ControlState> {
        lock(&self.controls).get(control).cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Plain-text snapshot of every region, for the operator console.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Services:");
        for (key, color) in lock(&self.indicators).iter() {
            let mark = match color {
                Some(Color::Green) => "UP  ",
                Some(Color::Red) => "DOWN",
                Some(Color::Gray) => "??  ",
                None => "    ",
            };
            let _ = writeln!(out, "  [{}] {}", mark, key);
        }

        let schedule = self.schedule_text().unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "Next scheduled restart: {}", schedule);

        let down = self.down_services();
        match down.count {
            Some(count) => {
                let _ = writeln!(out, "Down services: {} ({})", count, down.color.unwrap_or(Color::Gray));
                for name in &down.names {
                    let _ = writeln!(out, "  - {}", name);
                }
            }
            None => {
                let _ = writeln!(out, "Down services: -");
            }
        }

        let logs = self.log_count().map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "Activator logs: {}", logs);

        if self.log_panel_visible() {
            for row in self.log_rows() {
                let _ = writeln!(out, "  {:<26} {}", row.timestamp, row.message);
            }
        }

        let mut controls: Vec<_> = lock(&self.controls)
            .iter()
            .filter(|(_, state)| !state.enabled)
            .map(|(id, state)| format!("{} ({})", id, state.label))
            .collect();
        controls.sort();
        if !controls.is_empty() {
            let _ = writeln!(out, "In flight: {}", controls.join(", "));
        }

        for notice in self.notifications() {
            let tag = match notice.severity {
                Severity::Success => "ok",
                Severity::Error => "error",
            };
            let _ = writeln!(
                out,
                "[#{} {} {}] {}",
                notice.id,
                tag,
                notice.created_at.format("%H:%M:%S"),
                notice.message
            );
        }

        out
    }
}

impl View for RenderTree {
    fn set_indicator(&self, key: &str, color: Color) -> bool {
        match lock(&self.indicators).get_mut(key) {
            Some(slot) => {
                *slot = Some(color);
                true
            }
            None => false,
        }
    }

    fn set_schedule_text(&self, text: String) {
        *lock(&self.schedule_text) = Some(text);
    }

    fn set_down_services(&self, count: i64, color: Color, names: Vec<String>) {
        *lock(&self.down_services) = DownServices {
            count: Some(count),
            color: Some(color),
            names,
        };
    }

    fn set_log_count(&self, count: i64) {
        *lock(&self.log_count) = Some(count);
    }

    fn replace_log_rows(&self, rows: Vec<LogEntry>) {
        *lock(&self.log_rows) = rows;
    }

    fn log_panel_visible(&self) -> bool {
        *lock(&self.log_panel_visible)
    }

    fn set_log_panel_visible(&self, visible: bool) {
        *lock(&self.log_panel_visible) = visible;
    }

    fn set_control(&self, control: &ControlId, state: ControlState) {
        lock(&self.controls).insert(control.clone(), state);
    }

    fn push_notification(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }

    fn remove_notification(&self, id: NotificationId) -> bool {
        let mut notifications = lock(&self.notifications);
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        notifications.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_indicator_requires_anchor() {
        let tree = RenderTree::new(vec!["a".to_string()]);
        assert_eq!(tree.indicator("a"), None);

        assert!(tree.set_indicator("a", Color::Green));
        assert_eq!(tree.indicator("a"), Some(Color::Green));

        assert!(!tree.set_indicator("not-rendered", Color::Red));
        assert_eq!(tree.indicator("not-rendered"), None);
    }

    #[test]
    fn test_notifications_stack_and_remove() {
        let tree = RenderTree::new(Vec::new());
        for id in 1..=3 {
            tree.push_notification(Notification {
                id,
                message: "same".to_string(),
                severity: Severity::Success,
                created_at: Local::now(),
            });
        }
        assert_eq!(tree.notifications().len(), 3);

        assert!(tree.remove_notification(2));
        assert!(!tree.remove_notification(2));
        let ids: Vec<_> = tree.notifications().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_render_text() {
        let tree = RenderTree::new(vec!["billing|prod|web1|nginx".to_string(), "billing|prod|db1|pg".to_string()]);
        tree.set_indicator("billing|prod|web1|nginx", Color::Green);
        tree.set_down_services(1, Color::Red, vec!["billing|prod|db1|pg".to_string()]);
        tree.set_control(&ControlId::RefreshStatus, ControlState::busy(&ControlId::RefreshStatus));

        let text = tree.render_text();
        assert!(text.contains("[UP  ] billing|prod|web1|nginx"));
        assert!(text.contains("Down services: 1 (red)"));
        assert!(text.contains("  - billing|prod|db1|pg"));
        assert!(text.contains("In flight: refresh-status (Refreshing...)"));
    }
}
