//! Aggregate service-status polling.

use super::ErrorPolicy;
use crate::api::{Backend, StatusMap};
use crate::view::{Color, View};

use std::sync::Arc;

/// Polls `/api/service-statuses` and paints one indicator per status key.
///
/// Polls may overlap and are applied in completion order, so a slow poll can
/// overwrite a newer one until the next tick corrects it.
pub struct StatusSynchronizer {
    backend: Arc<dyn Backend>,
    view: Arc<dyn View>,
    policy: ErrorPolicy,
}

impl StatusSynchronizer {
    pub fn new(backend: Arc<dyn Backend>, view: Arc<dyn View>) -> Self {
        Self {
            backend,
            view,
            policy: ErrorPolicy::Silent,
        }
    }

    /// Fetch and apply one status snapshot.
    ///
    /// Returns the number of indicators painted, or `None` if the poll failed.
    /// Keys missing from the snapshot keep their last rendered state.
    pub async fn poll(&self) -> Option<usize> {
        match self.backend.service_statuses().await {
            Ok(statuses) => Some(self.apply(&statuses)),
            Err(e) => {
                self.policy.report("Error updating service statuses", &e);
                None
            }
        }
    }

    fn apply(&self, statuses: &StatusMap) -> usize {
        let mut painted = 0;
        for (key, state) in statuses {
            if self.view.set_indicator(key, Color::from(*state)) {
                painted += 1;
            } else {
                tracing::trace!("No indicator anchor for {}", key);
            }
        }
        tracing::debug!("Status poll applied: {}/{} indicators", painted, statuses.len());
        painted
    }
}
