//! Test utilities for microservice handler testing.
//!
//! This module provides request fixtures and instrumented middleware for
//! exercising the dispatcher and handlers.

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;

use crate::app::HandlerResult;
use crate::context::{RequestContext, RequestId, RequestInfo};
use crate::error::HandlerError;
use crate::middleware::Middleware;

/// Request bodies used across handler tests.
pub mod payloads {
    /// Complete payload; sums to `1389.57`.
    pub const VALID: &str = r#"{"x":"123.12","z":"789.89","y":"456.56", "vel":"20.0"}"#;

    /// Comma used as decimal separator in `x`.
    pub const MALFORMED: &str = r#"{"x":"123,12","z":"789.89","y":"456.56", "vel":"20.0"}"#;

    /// Missing `y` and `vel`.
    pub const INCOMPLETE: &str = r#"{"x":"123.12","z":"789.89"}"#;

    /// Expected location for [`VALID`] with the default sector.
    pub const VALID_LOCATION: f64 = 1389.57;
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> RequestId {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    RequestId::new(format!("test-{}", timestamp))
}

/// Fresh request context for unit tests.
pub fn test_context() -> RequestContext {
    RequestContext::new(test_request_id())
}

/// Shared log of middleware hook invocations.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
    statuses: Arc<Mutex<Vec<Option<StatusCode>>>>,
}

impl Recorder {
    /// Hook invocations in order, as `"<name>:before"` / `"<name>:after"`.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Status seen by each `after` hook.
    pub fn statuses(&self) -> Vec<Option<StatusCode>> {
        self.statuses.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

/// Middleware that records its hooks into a [`Recorder`].
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    name: &'static str,
    recorder: Recorder,
}

impl RecordingMiddleware {
    pub fn new(name: &'static str, recorder: Recorder) -> Self {
        Self { name, recorder }
    }
}

impl Middleware for RecordingMiddleware {
    fn name(&self) -> &'static str {
        self.name
    }

    fn before(&self, _ctx: &RequestContext, _info: &RequestInfo) -> Result<(), HandlerError> {
        self.recorder.push(format!("{}:before", self.name));
        Ok(())
    }

    fn after(&self, ctx: &RequestContext, _info: &RequestInfo, _outcome: &HandlerResult) {
        self.recorder.push(format!("{}:after", self.name));
        self.recorder.statuses.lock().unwrap().push(ctx.status());
    }
}

/// Middleware that rejects every request.
#[derive(Debug, Clone, Default)]
pub struct RejectingMiddleware;

impl Middleware for RejectingMiddleware {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn before(&self, _ctx: &RequestContext, _info: &RequestInfo) -> Result<(), HandlerError> {
        Err(HandlerError::Rejected {
            middleware: self.name(),
            reason: "rejected by test middleware".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        let id1 = test_request_id();
        let id2 = test_request_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn recorder_is_shared_between_clones() {
        let recorder = Recorder::default();
        let mw = RecordingMiddleware::new("a", recorder.clone());
        let ctx = test_context();
        let info = RequestInfo {
            method: axum::http::Method::GET,
            path: "/".to_string(),
            remote_addr: None,
        };

        mw.before(&ctx, &info).unwrap();
        assert_eq!(recorder.events(), ["a:before"]);
    }
}
