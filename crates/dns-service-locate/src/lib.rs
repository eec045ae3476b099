//! Drone navigation locate HTTP microservice.
//!
//! Computes a location value from coordinates and velocity reported by a
//! drone or ship.
//!
//! # Endpoints
//!
//! - `POST /v1/locate` - Solve a location (`X-System-Type: drone | ship`)
//! - `GET /` and `GET /health/live` - Liveness
//! - `GET /metrics` - Prometheus metrics
//!
//! # Example
//!
//! ```text
//! POST /v1/locate
//! X-System-Type: drone
//! {"x":"123.12","y":"456.56","z":"789.89","vel":"20.0"}
//!
//! 200 {"loc":1389.57}
//! ```

use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::routing::{get, MethodFilter};
use axum::Router;

use dns_lib::{Location, Navigator, SectorNavigator, SystemType};
use dns_service_shared::{
    decode, health_live, metrics_handler, read_body, record_location_failed,
    record_location_solved, respond, respond_error, App, Handler, LocateRequest,
    RequestContext, RequestLogger, RequestMetrics, ServiceConfig, ShutdownSignal, WebError,
};

/// Header carrying the caller's system type.
pub const SYSTEM_TYPE_HEADER: &str = "x-system-type";

const SERVICE: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Register every handler and the application middleware.
pub fn register(config: &ServiceConfig, shutdown: ShutdownSignal) -> App {
    let navigator: Arc<dyn Navigator> = Arc::new(SectorNavigator::new(config.sector_id));

    let mut app = App::new(
        shutdown,
        config.shutdown_policy,
        vec![Arc::new(RequestLogger), Arc::new(RequestMetrics)],
    );

    app.mount_handler(MethodFilter::GET, "/", health_live(SERVICE, VERSION), vec![])
        .mount_handler(
            MethodFilter::GET,
            "/health/live",
            health_live(SERVICE, VERSION),
            vec![],
        )
        .mount_handler(
            MethodFilter::POST,
            "/v1/locate",
            locate(navigator, config.max_body_bytes),
            vec![],
        );

    app
}

/// Full service router: registered handlers plus the metrics endpoint.
pub fn router(config: &ServiceConfig, shutdown: ShutdownSignal) -> Router {
    register(config, shutdown)
        .into_router()
        .route("/metrics", get(metrics_handler))
}

/// Handler for `POST /v1/locate`.
pub fn locate(navigator: Arc<dyn Navigator>, body_limit: usize) -> impl Handler {
    move |ctx: RequestContext, req: Request| {
        let navigator = Arc::clone(&navigator);
        async move {
            match solve_request(navigator.as_ref(), body_limit, req).await {
                Ok(location) => respond(&ctx, &location, StatusCode::OK),
                Err(err) => respond_error(&ctx, &err),
            }
        }
    }
}

async fn solve_request(
    navigator: &dyn Navigator,
    body_limit: usize,
    req: Request,
) -> Result<Location, WebError> {
    let system = SystemType::from_header(
        req.headers()
            .get(SYSTEM_TYPE_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    let body = read_body(req.into_body(), body_limit)
        .await
        .inspect_err(record_failure)?;
    let coords = decode::<LocateRequest>(&body).inspect_err(record_failure)?;
    let value = navigator.solve(&coords, system).map_err(|e| {
        record_location_failed(domain_failure_reason(&e));
        WebError::from(e)
    })?;

    record_location_solved(system.as_str());
    tracing::debug!(system_type = %system, value = value, "location solved");

    Ok(navigator.response(value, system))
}

fn record_failure(err: &WebError) {
    record_location_failed(failure_reason(err));
}

fn failure_reason(err: &WebError) -> &'static str {
    match err {
        WebError::Decode { .. } => "malformed",
        WebError::Validation { .. } => "validation_error",
        WebError::Request { .. } => "rejected",
        WebError::Internal(_) => "internal",
    }
}

fn domain_failure_reason(err: &dns_lib::Error) -> &'static str {
    match err {
        dns_lib::Error::UnknownSystemType => "unknown_system_type",
        dns_lib::Error::LocationOutOfRange => "out_of_range",
    }
}
