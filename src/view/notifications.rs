//! Transient operator notifications.

use super::{Notification, NotificationId, Severity, View};
use crate::sync::TaskSet;

use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Creates auto-dismissing notices on the view.
///
/// Notices stack without deduplication or a queue limit.
pub struct NotificationCenter {
    view: Arc<dyn View>,
    tasks: TaskSet,
    dwell: Duration,
    next_id: AtomicU64,
}

impl NotificationCenter {
    pub fn new(view: Arc<dyn View>, tasks: TaskSet, dwell: Duration) -> Self {
        Self {
            view,
            tasks,
            dwell,
            next_id: AtomicU64::new(1),
        }
    }

    /// Show `message` and schedule its removal after the dwell time.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = message.into();

        match severity {
            Severity::Success => tracing::info!("Notification: {}", message),
            Severity::Error => tracing::warn!("Notification: {}", message),
        }

        self.view.push_notification(Notification {
            id,
            message,
            severity,
            created_at: Local::now(),
        });

        let view = self.view.clone();
        self.tasks.spawn_delayed(self.dwell, async move {
            view.remove_notification(id);
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(message, Severity::Error)
    }

    /// Manual dismissal. Returns false if the notice was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.view.remove_notification(id)
    }
}
