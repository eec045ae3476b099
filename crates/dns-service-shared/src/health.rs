//! Health check handlers.
//!
//! Provides the home/liveness response served on `/` and `/health/live`.

use axum::extract::Request;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::app::{Handler, HandlerResult};
use crate::context::RequestContext;
use crate::response::respond;

/// Health status response for liveness probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
        }
    }
}

/// Liveness handler for `service` at `version`.
///
/// Always returns 200; it does not depend on any external resource.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"dns-service-locate","version":"0.1.0"}
/// ```
pub fn health_live(service: &'static str, version: &'static str) -> impl Handler {
    move |ctx: RequestContext, _req: Request| async move { live(ctx, service, version) }
}

fn live(ctx: RequestContext, service: &str, version: &str) -> HandlerResult {
    respond(&ctx, &HealthStatus::alive(service, version), StatusCode::OK)
}
