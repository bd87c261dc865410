//! Per-control in-flight guards.

use crate::view::{ControlId, ControlState, View};

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Tracks which controls have an action in flight.
pub struct ControlGuards {
    busy: Mutex<HashSet<ControlId>>,
    view: Arc<dyn View>,
}

impl ControlGuards {
    pub fn new(view: Arc<dyn View>) -> Arc<Self> {
        Arc::new(Self {
            busy: Mutex::new(HashSet::new()),
            view,
        })
    }

    fn busy(&self) -> MutexGuard<'_, HashSet<ControlId>> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self, control: &ControlId) -> bool {
        self.busy().contains(control)
    }

    /// Disable `control` and show its busy affordance.
    ///
    /// Returns `None` if the control already has an action in flight.
    pub fn try_acquire(self: &Arc<Self>, control: ControlId) -> Option<InFlight> {
        if !self.busy().insert(control.clone()) {
            return None;
        }
        self.view.set_control(&control, ControlState::busy(&control));

        Some(InFlight {
            restore_label: control.idle_label().to_string(),
            control,
            guards: Arc::clone(self),
        })
    }
}

/// An acquired control. Dropping it re-enables the control, whether the
/// action succeeded, failed or was abandoned.
pub struct InFlight {
    control: ControlId,
    restore_label: String,
    guards: Arc<ControlGuards>,
}

impl InFlight {
    /// Label to show once the control is re-enabled.
    pub fn restore_with(&mut self, label: impl Into<String>) {
        self.restore_label = label.into();
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        // Free the slot before the view shows the control as enabled.
        self.guards.busy().remove(&self.control);
        self.guards.view.set_control(
            &self.control,
            ControlState {
                enabled: true,
                label: std::mem::take(&mut self.restore_label),
            },
        );
    }
}
