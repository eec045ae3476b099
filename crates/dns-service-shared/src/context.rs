//! Per-request state shared between the dispatcher, middleware and handler.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use uuid::Uuid;

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new request ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Looks for the `X-Request-ID` header. If it is missing, empty or not valid
/// UTF-8, a new time-sortable UUID v7 is generated.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Request line details visible to middleware.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub remote_addr: Option<SocketAddr>,
}

impl RequestInfo {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            remote_addr: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        }
    }
}

/// Mutable state for a single request.
///
/// The dispatcher creates one per request and hands clones to every
/// middleware hook and to the handler. The formatter records the status it
/// wrote; the logging middleware reads it once the handler returns.
#[derive(Debug, Clone)]
pub struct RequestContext {
    inner: Arc<Values>,
}

#[derive(Debug)]
struct Values {
    request_id: RequestId,
    started_at: Instant,
    // 0 until a status is recorded
    status: AtomicU16,
}

impl RequestContext {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            inner: Arc::new(Values {
                request_id,
                started_at: Instant::now(),
                status: AtomicU16::new(0),
            }),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.inner.request_id
    }

    pub fn elapsed(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    /// Record the status code written to the client.
    pub fn set_status(&self, status: StatusCode) {
        self.inner.status.store(status.as_u16(), Ordering::Release);
    }

    /// Status recorded by the formatter, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.status.load(Ordering::Acquire) {
            0 => None,
            code => StatusCode::from_u16(code).ok(),
        }
    }

    /// Status to report for this request, falling back to 500 when the
    /// handler never recorded one.
    pub fn status_or_internal(&self) -> StatusCode {
        self.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
