//! In-memory backend for exercising the engine without a network.

use super::{
    ActivatorSummary, ApiError, Backend, LogsResponse, MessageResponse, OperationRequest,
    RefreshResponse, StatusMap,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Statuses,
    Operation,
    ActivatorStatus,
    Trigger,
    Refresh,
    Logs,
}

/// Scripted backend. Every call is counted; operator-facing calls can be held
/// open until `release` is called.
pub struct FakeBackend {
    statuses: Mutex<Result<StatusMap, ApiError>>,
    summary: Mutex<Result<ActivatorSummary, ApiError>>,
    operation: Mutex<Result<MessageResponse, ApiError>>,
    trigger: Mutex<Result<MessageResponse, ApiError>>,
    refresh: Mutex<Result<RefreshResponse, ApiError>>,
    logs: Mutex<Result<LogsResponse, ApiError>>,
    calls: Mutex<HashMap<Endpoint, usize>>,
    last_operation: Mutex<Option<OperationRequest>>,
    hold: AtomicBool,
    gate: Notify,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            statuses: Mutex::new(Ok(StatusMap::new())),
            summary: Mutex::new(Ok(ActivatorSummary::default())),
            operation: Mutex::new(Ok(MessageResponse::default())),
            trigger: Mutex::new(Ok(MessageResponse::default())),
            refresh: Mutex::new(Ok(RefreshResponse::default())),
            logs: Mutex::new(Ok(LogsResponse::default())),
            calls: Mutex::new(HashMap::new()),
            last_operation: Mutex::new(None),
            hold: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }
}

impl FakeBackend {
    pub fn set_statuses(&self, result: Result<StatusMap, ApiError>) {
        *self.statuses.lock().unwrap() = result;
    }

    pub fn set_summary(&self, result: Result<ActivatorSummary, ApiError>) {
        *self.summary.lock().unwrap() = result;
    }

    pub fn set_operation(&self, result: Result<MessageResponse, ApiError>) {
        *self.operation.lock().unwrap() = result;
    }

    pub fn set_trigger(&self, result: Result<MessageResponse, ApiError>) {
        *self.trigger.lock().unwrap() = result;
    }

    pub fn set_refresh(&self, result: Result<RefreshResponse, ApiError>) {
        *self.refresh.lock().unwrap() = result;
    }

    pub fn set_logs(&self, result: Result<LogsResponse, ApiError>) {
        *self.logs.lock().unwrap() = result;
    }

    /// Hold operator-facing calls (operation, trigger, refresh, logs) until released.
    pub fn hold_actions(&self, hold: bool) {
        self.hold.store(hold, Ordering::SeqCst);
    }

    /// Let one held call complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().unwrap().get(&endpoint).copied().unwrap_or(0)
    }

    pub fn last_operation(&self) -> Option<OperationRequest> {
        self.last_operation.lock().unwrap().clone()
    }

    fn record(&self, endpoint: Endpoint) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
    }

    async fn gate(&self) {
        if self.hold.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn service_statuses(&self) -> Result<StatusMap, ApiError> {
        self.record(Endpoint::Statuses);
        self.statuses.lock().unwrap().clone()
    }

    async fn service_operation(&self, request: &OperationRequest) -> Result<MessageResponse, ApiError> {
        self.record(Endpoint::Operation);
        *self.last_operation.lock().unwrap() = Some(request.clone());
        self.gate().await;
        self.operation.lock().unwrap().clone()
    }

    async fn activator_status(&self) -> Result<ActivatorSummary, ApiError> {
        self.record(Endpoint::ActivatorStatus);
        self.summary.lock().unwrap().clone()
    }

    async fn trigger_manual(&self) -> Result<MessageResponse, ApiError> {
        self.record(Endpoint::Trigger);
        self.gate().await;
        self.trigger.lock().unwrap().clone()
    }

    async fn refresh_status(&self) -> Result<RefreshResponse, ApiError> {
        self.record(Endpoint::Refresh);
        self.gate().await;
        self.refresh.lock().unwrap().clone()
    }

    async fn activator_logs(&self) -> Result<LogsResponse, ApiError> {
        self.record(Endpoint::Logs);
        self.gate().await;
        self.logs.lock().unwrap().clone()
    }
}
