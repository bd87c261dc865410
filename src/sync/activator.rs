//! Activator summary polling.

use super::ErrorPolicy;
use crate::api::{ActivatorSummary, Backend};
use crate::view::{Color, LogReconciler, View, NO_TIMESTAMP};

use chrono::{DateTime, Local, NaiveDateTime};
use std::sync::Arc;

/// Polls `/api/activator/status` and refreshes the schedule, down-service,
/// log-count and log-table regions.
pub struct ActivatorMonitor {
    backend: Arc<dyn Backend>,
    view: Arc<dyn View>,
    logs: LogReconciler,
    policy: ErrorPolicy,
}

impl ActivatorMonitor {
    pub fn new(backend: Arc<dyn Backend>, view: Arc<dyn View>) -> Self {
        Self {
            backend,
            logs: LogReconciler::new(view.clone()),
            view,
            policy: ErrorPolicy::Silent,
        }
    }

    /// Fetch and apply one summary. Returns false if the poll failed.
    pub async fn poll(&self) -> bool {
        match self.backend.activator_status().await {
            Ok(summary) => {
                self.apply(summary);
                true
            }
            Err(e) => {
                self.policy.report("Error updating activator status", &e);
                false
            }
        }
    }

    fn apply(&self, summary: ActivatorSummary) {
        self.view
            .set_schedule_text(format_schedule(summary.next_scheduled_restart.as_deref()));

        let color = if summary.down_services_count > 0 {
            Color::Red
        } else {
            Color::Green
        };
        self.view
            .set_down_services(summary.down_services_count, color, summary.down_services);

        self.view.set_log_count(summary.total_logs);
        self.logs.render(&summary.recent_logs);
    }
}

/// Render the next scheduled restart as local time, or `N/A`.
///
/// Accepts RFC 3339 and zone-less ISO date-times such as `2024-01-04T16:30`.
pub fn format_schedule(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(parse_schedule)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NO_TIMESTAMP.to_string())
}

fn parse_schedule(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
