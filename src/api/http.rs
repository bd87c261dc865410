//! HTTP backend implementation.

use super::{
    ActivatorSummary, ApiError, Backend, LogsResponse, MessageResponse, OperationRequest,
    RefreshResponse, StatusMap,
};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;

const STATUSES_PATH: &str = "/api/service-statuses";
const OPERATION_PATH: &str = "/api/service-operation";
const ACTIVATOR_STATUS_PATH: &str = "/api/activator/status";
const TRIGGER_MANUAL_PATH: &str = "/api/activator/trigger-manual";
const REFRESH_STATUS_PATH: &str = "/api/activator/refresh-status";
const ACTIVATOR_LOGS_PATH: &str = "/api/activator/logs";

/// Longest error body echoed back in an `ApiError::Status`.
const MAX_DETAIL_LEN: usize = 200;

/// Backend reached over HTTP with a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for `base_url`.
    ///
    /// `timeout` is left to the transport when `None`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
            base_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", base_url.trim_end_matches('/'))
        };

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response).await
    }

    /// POST with a JSON content type and no body, as the activator endpoints expect.
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull a readable reason out of an error body.
///
/// Prefers the `error` then `message` field of a JSON body, else the raw text.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["error", "message"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response".to_string();
    }
    trimmed.chars().take(MAX_DETAIL_LEN).collect()
}

#[async_trait]
impl Backend for HttpBackend {
    async fn service_statuses(&self) -> Result<StatusMap, ApiError> {
        self.get_json(STATUSES_PATH).await
    }

    async fn service_operation(&self, request: &OperationRequest) -> Result<MessageResponse, ApiError> {
        let response = self
            .client
            .post(self.url(OPERATION_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response).await
    }

    async fn activator_status(&self) -> Result<ActivatorSummary, ApiError> {
        self.get_json(ACTIVATOR_STATUS_PATH).await
    }

    async fn trigger_manual(&self) -> Result<MessageResponse, ApiError> {
        self.post_empty(TRIGGER_MANUAL_PATH).await
    }

    async fn refresh_status(&self) -> Result<RefreshResponse, ApiError> {
        self.post_empty(REFRESH_STATUS_PATH).await
    }

    async fn activator_logs(&self) -> Result<LogsResponse, ApiError> {
        self.get_json(ACTIVATOR_LOGS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ServiceDescriptor, ServiceState};

    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetches_statuses() {
        let router = Router::new().route(
            STATUSES_PATH,
            get(|| async { Json(json!({"billing|prod|web1|nginx": "up", "billing|prod|db1|pg": "down", "x": "stale"})) }),
        );
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        let statuses = backend.service_statuses().await.unwrap();
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses["billing|prod|web1|nginx"], ServiceState::Up);
        assert_eq!(statuses["billing|prod|db1|pg"], ServiceState::Down);
        assert_eq!(statuses["x"], ServiceState::Unknown);
    }

    #[tokio::test]
    async fn test_posts_operation_request() {
        let router = Router::new().route(
            OPERATION_PATH,
            post(|Json(body): Json<Value>| async move {
                let message = format!("{} command executed", body["operation"].as_str().unwrap_or("?"));
                let details = body["serviceName"].clone();
                Json(json!({
                    "status": "success",
                    "message": message,
                    "details": details,
                }))
            }),
        );
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        let request = OperationRequest::restart(ServiceDescriptor {
            service_name: "nginx".to_string(),
            ..Default::default()
        });
        let response = backend.service_operation(&request).await.unwrap();
        assert_eq!(response.message.as_deref(), Some("restart command executed"));
        assert_eq!(response.details.as_deref(), Some("nginx"));
    }

    #[tokio::test]
    async fn test_error_status_carries_detail() {
        let router = Router::new().route(
            REFRESH_STATUS_PATH,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to refresh statuses: lock held"})),
                )
            }),
        );
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();

        let err = backend.refresh_status().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                detail: "Failed to refresh statuses: lock held".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_route_is_status_error() {
        let backend = HttpBackend::new(&serve(Router::new()).await, None).unwrap();
        let err = backend.activator_logs().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let router = Router::new().route(ACTIVATOR_STATUS_PATH, get(|| async { "not json" }));
        let backend = HttpBackend::new(&serve(router).await, None).unwrap();
        let err = backend.activator_status().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let backend = HttpBackend::new("http://256.256.256.256", None).unwrap();
        let err = backend.trigger_manual().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"message":"nope"}"#), "nope");
        assert_eq!(error_detail("  gateway down "), "gateway down");
        assert_eq!(error_detail(""), "empty response");
    }

    #[test]
    fn test_base_url_normalized() {
        let backend = HttpBackend::new("ops.internal:8080/", None).unwrap();
        assert_eq!(backend.url(STATUSES_PATH), "http://ops.internal:8080/api/service-statuses");
    }
}
