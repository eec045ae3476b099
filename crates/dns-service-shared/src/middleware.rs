//! Cross-cutting middleware for drone navigation services.
//!
//! This module provides:
//! - [`Middleware`]: interceptor with `before`/`after` hooks around a handler
//! - [`RequestLogger`]: one structured log line per request
//! - [`RequestMetrics`]: HTTP request counters and latency histograms
//!
//! # Ordering
//!
//! Middleware runs as an onion. For a chain `[a, b]` the order is
//! `a.before → b.before → handler → b.after → a.after`. If a `before` hook
//! fails, the handler is skipped and only the `after` hooks of middleware
//! that were already entered run.

use crate::app::HandlerResult;
use crate::context::{RequestContext, RequestInfo};
use crate::error::HandlerError;

/// Interceptor around a handler invocation.
pub trait Middleware: Send + Sync + 'static {
    /// Short name used in logs and rejection errors.
    fn name(&self) -> &'static str;

    /// Runs before the handler. Returning an error short-circuits the chain.
    fn before(&self, _ctx: &RequestContext, _info: &RequestInfo) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Runs after the handler (or after a short-circuit further in).
    fn after(&self, _ctx: &RequestContext, _info: &RequestInfo, _outcome: &HandlerResult) {}
}

/// Logs every request once it has been handled.
///
/// The status comes from the request context; when the handler never
/// recorded one (it failed before responding) the line reports 500.
#[derive(Debug, Clone, Default)]
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn name(&self) -> &'static str {
        "request_logger"
    }

    fn after(&self, ctx: &RequestContext, info: &RequestInfo, outcome: &HandlerResult) {
        let status = ctx.status_or_internal().as_u16();
        let latency_ms = ctx.elapsed().as_secs_f64() * 1000.0;
        let remote_addr = info
            .remote_addr
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());

        if outcome.is_ok() {
            tracing::info!(
                request_id = %ctx.request_id(),
                status = status,
                method = %info.method,
                path = %info.path,
                remote_addr = %remote_addr,
                latency_ms = latency_ms,
                "request completed"
            );
        } else {
            tracing::warn!(
                request_id = %ctx.request_id(),
                status = status,
                method = %info.method,
                path = %info.path,
                remote_addr = %remote_addr,
                latency_ms = latency_ms,
                "request failed"
            );
        }
    }
}

/// Records HTTP metrics for every request.
///
/// - `http_requests_total`: Counter by method, path, status bucket
/// - `http_request_duration_seconds`: Histogram by method, path
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics;

impl Middleware for RequestMetrics {
    fn name(&self) -> &'static str {
        "request_metrics"
    }

    fn after(&self, ctx: &RequestContext, info: &RequestInfo, _outcome: &HandlerResult) {
        let method = info.method.to_string();
        let status = status_bucket(ctx.status_or_internal().as_u16());

        metrics::counter!(
            "http_requests_total",
            "method" => method.clone(),
            "path" => info.path.clone(),
            "status" => status
        )
        .increment(1);

        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => method,
            "path" => info.path.clone()
        )
        .record(ctx.elapsed().as_secs_f64());
    }
}

/// Convert HTTP status code to bucket label.
fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
