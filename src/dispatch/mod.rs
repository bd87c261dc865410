//! Operator-triggered commands.
//!
//! Every action disables its own control, issues one backend call, restores
//! the control once the call settles, tells the operator how it went and
//! schedules the re-polls that bring the view back to server truth.

mod guard;

pub use guard::*;

use crate::api::{Backend, OperationRequest, ServiceDescriptor, StatusKey};
use crate::sync::{ActivatorMonitor, ErrorPolicy, StatusSynchronizer, TaskSet};
use crate::view::{ControlId, LogReconciler, NotificationCenter, View, HIDE_LOGS_LABEL};

use std::sync::Arc;
use std::time::Duration;

/// Wait before re-polling statuses after a restart.
pub const RESTART_SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Wait before re-polling after a manual activator run.
pub const TRIGGER_SETTLE_DELAY: Duration = Duration::from_secs(5);
/// Wait before re-polling the activator after a refresh.
pub const REFRESH_ACTIVATOR_DELAY: Duration = Duration::from_secs(2);

/// How a dispatched action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Completed,
    Failed,
    /// The control already had an action in flight; nothing was sent.
    Busy,
}

pub struct OperationDispatcher {
    backend: Arc<dyn Backend>,
    view: Arc<dyn View>,
    notices: Arc<NotificationCenter>,
    status: Arc<StatusSynchronizer>,
    activator: Arc<ActivatorMonitor>,
    logs: LogReconciler,
    guards: Arc<ControlGuards>,
    tasks: TaskSet,
    policy: ErrorPolicy,
}

impl OperationDispatcher {
    pub fn new(
        backend: Arc<dyn Backend>,
        view: Arc<dyn View>,
        notices: Arc<NotificationCenter>,
        status: Arc<StatusSynchronizer>,
        activator: Arc<ActivatorMonitor>,
        tasks: TaskSet,
    ) -> Self {
        Self {
            backend,
            logs: LogReconciler::new(view.clone()),
            guards: ControlGuards::new(view.clone()),
            view,
            policy: ErrorPolicy::Surface(notices.clone()),
            notices,
            status,
            activator,
            tasks,
        }
    }

    pub fn is_busy(&self, control: &ControlId) -> bool {
        self.guards.is_busy(control)
    }

    /// Restart one service and re-poll statuses once it has had time to settle.
    pub async fn restart_service(&self, key: &StatusKey, descriptor: &ServiceDescriptor) -> Dispatch {
        let Some(in_flight) = self.guards.try_acquire(ControlId::Restart(key.clone())) else {
            tracing::debug!("Restart of {} already in flight", key);
            return Dispatch::Busy;
        };

        tracing::info!(
            "Restarting {} on {} ({})",
            descriptor.service_name,
            descriptor.server_name,
            descriptor.server_ip
        );
        let result = self
            .backend
            .service_operation(&OperationRequest::restart(descriptor.clone()))
            .await;
        drop(in_flight);

        match result {
            Ok(response) => {
                if let Some(details) = &response.details {
                    tracing::debug!("Restart output for {}: {}", key, details);
                }
                self.notices.success(
                    response
                        .message
                        .unwrap_or_else(|| "Service restarted successfully!".to_string()),
                );

                let status = self.status.clone();
                self.tasks.spawn_delayed(RESTART_SETTLE_DELAY, async move {
                    status.poll().await;
                });
                Dispatch::Completed
            }
            Err(e) => {
                self.policy.report("Failed to restart service", &e);
                Dispatch::Failed
            }
        }
    }

    /// Start an activator run now, then re-poll both synchronizers.
    pub async fn trigger_manual_restart(&self) -> Dispatch {
        let Some(in_flight) = self.guards.try_acquire(ControlId::TriggerManual) else {
            return Dispatch::Busy;
        };

        let result = self.backend.trigger_manual().await;
        drop(in_flight);

        match result {
            Ok(response) => {
                self.notices.success(
                    response
                        .message
                        .unwrap_or_else(|| "Manual restart triggered successfully!".to_string()),
                );

                let (status, activator) = (self.status.clone(), self.activator.clone());
                self.tasks.spawn_delayed(TRIGGER_SETTLE_DELAY, async move {
                    tokio::join!(activator.poll(), status.poll());
                });
                Dispatch::Completed
            }
            Err(e) => {
                self.policy.report("Failed to trigger manual restart", &e);
                Dispatch::Failed
            }
        }
    }

    /// Ask the backend to re-check every service.
    ///
    /// A 2xx response carrying `error` is still a failure and chains no polls.
    pub async fn refresh_status(&self) -> Dispatch {
        let Some(in_flight) = self.guards.try_acquire(ControlId::RefreshStatus) else {
            return Dispatch::Busy;
        };

        let result = self.backend.refresh_status().await;
        drop(in_flight);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.policy.report("Failed to refresh statuses", &e);
                return Dispatch::Failed;
            }
        };

        if let Some(error) = response.error {
            self.policy.report("Failed to refresh statuses", &error);
            return Dispatch::Failed;
        }

        self.notices.success(
            response
                .message
                .unwrap_or_else(|| "Service statuses refreshed successfully!".to_string()),
        );

        let status = self.status.clone();
        self.tasks.spawn_now(async move {
            status.poll().await;
        });
        let activator = self.activator.clone();
        self.tasks.spawn_delayed(REFRESH_ACTIVATOR_DELAY, async move {
            activator.poll().await;
        });
        Dispatch::Completed
    }

    /// Show or hide the full log panel.
    ///
    /// Revealing fetches the full log first; hiding makes no network call.
    pub async fn toggle_logs(&self) -> Dispatch {
        let Some(mut in_flight) = self.guards.try_acquire(ControlId::ToggleLogs) else {
            return Dispatch::Busy;
        };

        if self.view.log_panel_visible() {
            self.view.set_log_panel_visible(false);
            return Dispatch::Completed;
        }

        match self.backend.activator_logs().await {
            Ok(response) => {
                self.logs.render(&response.logs);
                self.view.set_log_panel_visible(true);
                in_flight.restore_with(HIDE_LOGS_LABEL);
                Dispatch::Completed
            }
            Err(e) => {
                drop(in_flight);
                self.policy.report("Failed to fetch logs", &e);
                Dispatch::Failed
            }
        }
    }
}
