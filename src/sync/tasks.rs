//! Recurring and deferred background tasks with explicit teardown.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

/// Owner of every background task the dashboard spawns.
///
/// Clones share one stop channel; `shutdown` ends recurring loops and drops
/// deferred work that has not fired yet. Work that already started runs to
/// completion.
#[derive(Clone)]
pub struct TaskSet {
    stop: broadcast::Sender<()>,
    stopped: Arc<AtomicBool>,
}

impl Default for TaskSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSet {
    pub fn new() -> Self {
        let (stop, _) = broadcast::channel(1);
        Self {
            stop,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Run `tick` immediately and then every `period`.
    ///
    /// Each tick is spawned on its own, so a slow run never delays or blocks
    /// the next one.
    pub fn spawn_recurring<F, Fut>(&self, name: &'static str, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // Subscribe before checking, so a concurrent shutdown is seen by one or the other.
        let mut stop_rx = self.stop.subscribe();
        if self.is_stopped() {
            return;
        }

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = interval.tick() => {
                        tokio::spawn(tick());
                    }
                }
            }

            tracing::debug!("Recurring task {} stopped", name);
        });
    }

    /// Run `task` once after `delay`, unless the set is shut down first.
    pub fn spawn_delayed<Fut>(&self, delay: Duration, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut stop_rx = self.stop.subscribe();
        if self.is_stopped() {
            return;
        }

        tokio::spawn(async move {
            tokio::select! {
                _ = stop_rx.recv() => {}
                _ = tokio::time::sleep(delay) => task.await,
            }
        });
    }

    /// Run `task` right away in the background.
    pub fn spawn_now<Fut>(&self, task: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_stopped() {
            return;
        }
        tokio::spawn(task);
    }

    /// Stop all recurring loops and pending deferred tasks.
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.stop.send(());
    }
}
