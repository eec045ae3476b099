//! Prometheus metrics infrastructure for drone navigation services.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for the `/metrics` endpoint
//! - Business metric helpers for the locate service
//!
//! # Example
//!
//! ```no_run
//! use dns_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Self { enabled }
    }
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    #[error("metrics are disabled")]
    Disabled,
    /// The recorder has already been installed.
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if metrics are disabled, the recorder is already
/// installed, or the Prometheus builder fails.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Axum handler for the `/metrics` endpoint.
///
/// Returns Prometheus exposition format text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Record a successfully solved location.
///
/// Increments `dns_locations_solved_total`.
pub fn record_location_solved(system_type: &str) {
    metrics::counter!(
        "dns_locations_solved_total",
        "system_type" => system_type.to_string()
    )
    .increment(1);
}

/// Record a failed locate request.
///
/// Increments `dns_locations_failed_total`. Reasons in use:
/// `malformed`, `validation_error`, `unknown_system_type`, `out_of_range`.
pub fn record_location_failed(reason: &str) {
    metrics::counter!(
        "dns_locations_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        assert!(MetricsConfig::default().enabled);
    }

    #[test]
    fn test_disabled_metrics_are_not_installed() {
        let err = init_metrics(&MetricsConfig { enabled: false }).unwrap_err();
        assert!(matches!(err, MetricsError::Disabled));
    }

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_format() {
        let output = metrics_handler().await;
        assert!(
            output.contains('#') || output.is_empty(),
            "Metrics output should be Prometheus format or indicate not initialized"
        );
    }

    #[test]
    fn test_business_metrics_record_without_recorder() {
        record_location_solved("drone");
        record_location_solved("ship");
        record_location_failed("malformed");
        record_location_failed("validation_error");
        record_location_failed("unknown_system_type");
        record_location_failed("out_of_range");
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        assert!(MetricsError::InstallFailed("test error".to_string())
            .to_string()
            .contains("test error"));
    }
}
