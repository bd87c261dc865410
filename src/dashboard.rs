//! Wiring of the synchronizers, the dispatcher and the notification sink.

use crate::api::Backend;
use crate::catalog::ServiceCatalog;
use crate::config::DashboardConfig;
use crate::dispatch::OperationDispatcher;
use crate::sync::{ActivatorMonitor, StatusSynchronizer, TaskSet};
use crate::view::{ControlId, ControlState, NotificationCenter, View};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Poll cadences and notification lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub status_interval: Duration,
    pub activator_interval: Duration,
    pub notification_dwell: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for Timings {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            status_interval: cfg.status_interval,
            activator_interval: cfg.activator_interval,
            notification_dwell: cfg.notification_dwell,
        }
    }
}

/// The running dashboard session.
pub struct Dashboard {
    status: Arc<StatusSynchronizer>,
    activator: Arc<ActivatorMonitor>,
    dispatcher: Arc<OperationDispatcher>,
    notices: Arc<NotificationCenter>,
    tasks: TaskSet,
    timings: Timings,
    started: AtomicBool,
}

impl Dashboard {
    /// Build the engine and put every control in its idle state.
    pub fn new(
        backend: Arc<dyn Backend>,
        view: Arc<dyn View>,
        catalog: &ServiceCatalog,
        timings: Timings,
    ) -> Self {
        let tasks = TaskSet::new();
        let notices = Arc::new(NotificationCenter::new(
            view.clone(),
            tasks.clone(),
            timings.notification_dwell,
        ));
        let status = Arc::new(StatusSynchronizer::new(backend.clone(), view.clone()));
        let activator = Arc::new(ActivatorMonitor::new(backend.clone(), view.clone()));
        let dispatcher = Arc::new(OperationDispatcher::new(
            backend,
            view.clone(),
            notices.clone(),
            status.clone(),
            activator.clone(),
            tasks.clone(),
        ));

        let controls = catalog
            .keys()
            .map(|key| ControlId::Restart(key.clone()))
            .chain([
                ControlId::TriggerManual,
                ControlId::RefreshStatus,
                ControlId::ToggleLogs,
            ]);
        for control in controls {
            view.set_control(&control, ControlState::idle(&control));
        }

        Self {
            status,
            activator,
            dispatcher,
            notices,
            tasks,
            timings,
            started: AtomicBool::new(false),
        }
    }

    /// Poll both synchronizers now, then on their own cadences until shutdown.
    ///
    /// Calling it again while running does nothing.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::warn!("Dashboard sync already running");
            return;
        }
        tracing::info!(
            "Starting sync: statuses every {:?}, activator every {:?}",
            self.timings.status_interval,
            self.timings.activator_interval
        );

        let status = self.status.clone();
        self.tasks
            .spawn_recurring("status-sync", self.timings.status_interval, move || {
                let status = status.clone();
                async move {
                    status.poll().await;
                }
            });

        let activator = self.activator.clone();
        self.tasks
            .spawn_recurring("activator-monitor", self.timings.activator_interval, move || {
                let activator = activator.clone();
                async move {
                    activator.poll().await;
                }
            });
    }

    pub fn dispatcher(&self) -> Arc<OperationDispatcher> {
        self.dispatcher.clone()
    }

    pub fn notices(&self) -> &NotificationCenter {
        &self.notices
    }

    /// Stop recurring polls, pending re-polls and pending notification removals.
    pub fn shutdown(&self) {
        self.tasks.shutdown();
        tracing::info!("Dashboard sync stopped");
    }
}
