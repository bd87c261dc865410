//! Synchronization module: background polls that reconcile backend state into the view.

mod activator;
mod status;
mod tasks;

pub use activator::*;
pub use status::*;
pub use tasks::*;

use crate::view::NotificationCenter;

use std::fmt;
use std::sync::Arc;

/// Where failures of a calling context go.
///
/// Background polls run `Silent`: failures reach the log only, and the last
/// good snapshot stays on screen. Operator actions run `Surface`: the
/// operator is waiting, so failures also become error notifications.
#[derive(Clone)]
pub enum ErrorPolicy {
    Silent,
    Surface(Arc<NotificationCenter>),
}

impl ErrorPolicy {
    pub fn report(&self, context: &str, err: &dyn fmt::Display) {
        match self {
            ErrorPolicy::Silent => {
                tracing::warn!("{}: {}", context, err);
            }
            ErrorPolicy::Surface(notices) => {
                tracing::error!("{}: {}", context, err);
                notices.error(format!("{}: {}", context, err));
            }
        }
    }
}
