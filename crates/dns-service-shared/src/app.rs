//! Request dispatcher.
//!
//! [`App`] owns route registration. Each mounted [`Handler`] is wrapped in
//! the application middleware (outermost, in registration order) followed by
//! its route middleware, and served through an `axum::Router`:
//!
//! ```text
//! request ─▶ RequestContext ─▶ middleware.before… ─▶ handler ─▶ …middleware.after ─▶ response
//! ```
//!
//! A handler error is an error that escaped the formatter. The dispatcher
//! logs it, answers with a generic 500 and, under
//! [`ShutdownPolicy::Shutdown`], asks the whole process to stop.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, MethodRouter};
use axum::{Json, Router};

use crate::context::{extract_or_generate_request_id, RequestContext, RequestInfo};
use crate::error::{ErrorResponse, HandlerError, MSG_INTERNAL};
use crate::middleware::Middleware;
use crate::shutdown::{ShutdownReason, ShutdownSignal};

/// Outcome of a handler invocation.
pub type HandlerResult = Result<Response, HandlerError>;

/// Boxed, sendable future returned by handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A request handler.
///
/// Implemented for every `Fn(RequestContext, Request) -> impl Future<Output = HandlerResult>`,
/// so plain `async fn`s and capturing closures both work.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext, req: Request) -> BoxFuture<HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: RequestContext, req: Request) -> BoxFuture<HandlerResult> {
        Box::pin(self(ctx, req))
    }
}

/// What the dispatcher does after a handler error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Log the error and keep serving.
    #[default]
    LogOnly,
    /// Log the error and signal the process to shut down.
    Shutdown,
}

/// Shared middleware handle.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// Entrypoint for a service: routes plus cross-cutting middleware.
pub struct App {
    routes: BTreeMap<String, MethodRouter>,
    middleware: Vec<SharedMiddleware>,
    shutdown: ShutdownSignal,
    policy: ShutdownPolicy,
}

impl App {
    /// Construct an app with application-wide middleware.
    ///
    /// Middleware listed first wraps outermost.
    pub fn new(
        shutdown: ShutdownSignal,
        policy: ShutdownPolicy,
        middleware: Vec<SharedMiddleware>,
    ) -> Self {
        Self {
            routes: BTreeMap::new(),
            middleware,
            shutdown,
            policy,
        }
    }

    /// Mount `handler` on `method` + `path`, wrapped in the application
    /// middleware and then `middleware`.
    pub fn mount_handler<H: Handler>(
        &mut self,
        method: MethodFilter,
        path: &str,
        handler: H,
        middleware: Vec<SharedMiddleware>,
    ) -> &mut Self {
        let chain = Arc::new(Chain {
            middleware: self.middleware.iter().cloned().chain(middleware).collect(),
            handler: Arc::new(handler),
        });
        let shutdown = self.shutdown.clone();
        let policy = self.policy;

        let endpoint = move |req: Request| {
            let chain = Arc::clone(&chain);
            let shutdown = shutdown.clone();
            async move { dispatch(&chain, &shutdown, policy, req).await }
        };

        let router = self
            .routes
            .remove(path)
            .unwrap_or_else(MethodRouter::new)
            .on(method, endpoint);
        self.routes.insert(path.to_string(), router);
        self
    }

    /// Build the axum router for all mounted handlers.
    pub fn into_router(self) -> Router {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            })
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field(
                "middleware",
                &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .finish()
    }
}

/// Handler wrapped in its ordered middleware.
struct Chain {
    middleware: Vec<SharedMiddleware>,
    handler: Arc<dyn Handler>,
}

impl Chain {
    async fn run(&self, ctx: &RequestContext, info: &RequestInfo, req: Request) -> HandlerResult {
        let mut entered = 0;
        let mut rejected = None;
        for mw in &self.middleware {
            if let Err(e) = mw.before(ctx, info) {
                rejected = Some(e);
                break;
            }
            entered += 1;
        }

        let outcome = match rejected {
            Some(e) => Err(e),
            None => self.handler.call(ctx.clone(), req).await,
        };

        for mw in self.middleware[..entered].iter().rev() {
            mw.after(ctx, info, &outcome);
        }
        outcome
    }
}

async fn dispatch(
    chain: &Chain,
    shutdown: &ShutdownSignal,
    policy: ShutdownPolicy,
    req: Request,
) -> Response {
    let ctx = RequestContext::new(extract_or_generate_request_id(req.headers()));
    let info = RequestInfo::from_request(&req);

    match chain.run(&ctx, &info, req).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(
                request_id = %ctx.request_id(),
                method = %info.method,
                path = %info.path,
                error = %err,
                "unhandled handler error"
            );
            if policy == ShutdownPolicy::Shutdown {
                shutdown.request(ShutdownReason::HandlerFailure(err.to_string()));
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(MSG_INTERNAL)),
            )
                .into_response()
        }
    }
}
