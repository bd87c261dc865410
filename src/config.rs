//! Configuration module for FleetDash.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Dashboard configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the orchestrator backend (default: "http://127.0.0.1:8080")
    pub base_url: String,
    /// Cadence of the aggregate status poll (default: 5s)
    pub status_interval: Duration,
    /// Cadence of the activator summary poll (default: 30s)
    pub activator_interval: Duration,
    /// How long a notification stays on screen (default: 5s)
    pub notification_dwell: Duration,
    /// Path to the service catalog JSON file (default: "services.json")
    pub services_path: String,
    /// Optional transport timeout; none by default
    pub request_timeout: Option<Duration>,
    /// Ask for confirmation before each restart (default: false)
    pub confirm_restart: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            status_interval: Duration::from_secs(5),
            activator_interval: Duration::from_secs(30),
            notification_dwell: Duration::from_secs(5),
            services_path: "services.json".to_string(),
            request_timeout: None,
            confirm_restart: false,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FLEETDASH_BASE_URL`: backend base URL
    /// - `FLEETDASH_STATUS_INTERVAL_SECS`: status poll cadence in seconds
    /// - `FLEETDASH_ACTIVATOR_INTERVAL_SECS`: activator poll cadence in seconds
    /// - `FLEETDASH_NOTIFICATION_DWELL_SECS`: notification lifetime in seconds
    /// - `FLEETDASH_SERVICES_PATH`: service catalog file
    /// - `FLEETDASH_REQUEST_TIMEOUT_SECS`: transport timeout in seconds
    /// - `FLEETDASH_CONFIRM_RESTART`: "1"/"true"/"yes" to confirm restarts
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(url) = lookup("FLEETDASH_BASE_URL") {
            if !url.trim().is_empty() {
                cfg.base_url = url.trim().to_string();
            }
        }

        if let Some(secs) = lookup("FLEETDASH_STATUS_INTERVAL_SECS").and_then(|s| parse_secs(&s)) {
            cfg.status_interval = secs;
        }

        if let Some(secs) = lookup("FLEETDASH_ACTIVATOR_INTERVAL_SECS").and_then(|s| parse_secs(&s)) {
            cfg.activator_interval = secs;
        }

        if let Some(secs) = lookup("FLEETDASH_NOTIFICATION_DWELL_SECS").and_then(|s| parse_secs(&s)) {
            cfg.notification_dwell = secs;
        }

        if let Some(path) = lookup("FLEETDASH_SERVICES_PATH") {
            cfg.services_path = path;
        }

        cfg.request_timeout = lookup("FLEETDASH_REQUEST_TIMEOUT_SECS").and_then(|s| parse_secs(&s));

        if let Some(flag) = lookup("FLEETDASH_CONFIRM_RESTART") {
            cfg.confirm_restart = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        cfg
    }
}

/// Parse a positive number of seconds. Zero would make `tokio::time::interval` panic.
fn parse_secs(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs > 0.0 && secs.is_finite() => Some(Duration::from_secs_f64(secs)),
        _ => None,
    }
}
