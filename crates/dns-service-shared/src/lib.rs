//! Shared infrastructure for drone navigation HTTP microservices.
//!
//! This crate provides the request lifecycle used by every service:
//!
//! - [`App`]: route registration and dispatch, with ordered [`Middleware`]
//! - [`RequestContext`]: per-request state (request id, start time, status)
//! - [`decode`] and [`Validate`]: two-step request parsing
//! - [`respond`] and [`respond_error`]: the only way handlers write responses
//! - [`WebError`]: the error taxonomy rendered into JSON envelopes
//! - [`logging`], [`metrics`], [`health`]: ambient service concerns
//! - [`shutdown`]: the process-wide shutdown signal
//!
//! # Architecture
//!
//! Services follow a thin-handler pattern where the navigation logic lives
//! in `dns-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Handler                                                    │
//! │  - Decode request body        (WebError::Decode → 400)      │
//! │  - Validate fields            (WebError::Validation → 422)  │
//! │  - Call dns-lib navigator     (WebError::Request → 400)     │
//! │  - respond / respond_error                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides payload fixtures and instrumented
//! middleware. Enable the `test-utils` feature to access it from dependent
//! crates.

#![deny(warnings)]

mod app;
pub mod config;
mod context;
mod error;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod request;
mod response;
pub mod shutdown;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::{App, BoxFuture, Handler, HandlerResult, SharedMiddleware, ShutdownPolicy};
pub use config::{ConfigError, ServiceConfig};
pub use context::{extract_or_generate_request_id, RequestContext, RequestId, RequestInfo};
pub use error::{
    ErrorResponse, FieldError, HandlerError, WebError, MSG_INTERNAL, MSG_MALFORMED,
    MSG_VALIDATION,
};
pub use health::{health_live, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_location_failed, record_location_solved,
    MetricsConfig, MetricsError,
};
pub use middleware::{Middleware, RequestLogger, RequestMetrics};
pub use request::{decode, read_body, LocateRequest, Validate};
pub use response::{respond, respond_error};
pub use shutdown::{shutdown_channel, ShutdownListener, ShutdownReason, ShutdownSignal};
