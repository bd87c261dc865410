//! Wire types exchanged with the orchestrator backend.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Stable identifier correlating a backend-reported state with its indicator.
///
/// The backend builds these as `app|env|server|service`, but the dashboard
/// treats them as opaque.
pub type StatusKey = String;

/// Static description of one controllable service.
///
/// Identifies what a restart targets and how the backend should run it.
/// Command and script fields are absent for service types that do not use them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub app_name: String,
    pub server_name: String,
    pub server_ip: String,
    pub server_os: String,
    pub service_name: String,
    pub service_type: String,
    #[serde(default)]
    pub startup_cmd: Option<String>,
    #[serde(default)]
    pub start_script: Option<String>,
    #[serde(default)]
    pub status_cmd: Option<String>,
    #[serde(default)]
    pub status_script: Option<String>,
    #[serde(default)]
    pub stop_cmd: Option<String>,
    #[serde(default)]
    pub stop_script: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Restart,
}

/// Body of `POST /api/service-operation`. Built fresh per operator action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRequest {
    #[serde(flatten)]
    pub descriptor: ServiceDescriptor,
    pub operation: OperationKind,
}

impl OperationRequest {
    pub fn restart(descriptor: ServiceDescriptor) -> Self {
        Self {
            descriptor,
            operation: OperationKind::Restart,
        }
    }
}

/// Reported state of one service.
///
/// Anything other than `"up"` or `"down"` (including non-string JSON) is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Up,
    Down,
    Unknown,
}

impl ServiceState {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "up" => ServiceState::Up,
            "down" => ServiceState::Down,
            _ => ServiceState::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for ServiceState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(ServiceState::from_raw)
            .unwrap_or(ServiceState::Unknown))
    }
}

/// Result of one aggregate status poll.
pub type StatusMap = HashMap<StatusKey, ServiceState>;

/// Summary returned by `GET /api/activator/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatorSummary {
    #[serde(default)]
    pub next_scheduled_restart: Option<String>,
    #[serde(default)]
    pub down_services_count: i64,
    #[serde(default)]
    pub down_services: Vec<String>,
    #[serde(default)]
    pub total_logs: i64,
    #[serde(default)]
    pub recent_logs: Vec<String>,
}

/// Response of the service-operation and manual-trigger endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Raw command output, only sent by the service-operation endpoint.
    #[serde(default)]
    pub details: Option<String>,
}

/// Response of the refresh endpoint. `error` is a soft error on a 2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}
