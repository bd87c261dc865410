//! Backend API module.
//!
//! Consumed contracts of the orchestrator: aggregate statuses, service
//! operations and the activator endpoints.

mod http;
mod models;

#[cfg(test)]
pub mod fake;

pub use http::*;
pub use models::*;

use async_trait::async_trait;
use thiserror::Error;

/// Backend call failures.
///
/// `Transport` means the request never completed; the other variants are
/// application failures on a completed request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The orchestrator as seen by the dashboard.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn service_statuses(&self) -> Result<StatusMap, ApiError>;

    async fn service_operation(&self, request: &OperationRequest) -> Result<MessageResponse, ApiError>;

    async fn activator_status(&self) -> Result<ActivatorSummary, ApiError>;

    async fn trigger_manual(&self) -> Result<MessageResponse, ApiError>;

    async fn refresh_status(&self) -> Result<RefreshResponse, ApiError>;

    async fn activator_logs(&self) -> Result<LogsResponse, ApiError>;
}
