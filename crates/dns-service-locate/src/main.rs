//! Drone navigation locate HTTP microservice.
//!
//! # Configuration
//!
//! - `SERVICE_HOST` / `SERVICE_PORT` - Bind address (default: 0.0.0.0:8080)
//! - `SECTOR_ID` - Navigation sector (default: 1)
//! - `MAX_BODY_BYTES` - Request body limit (default: 65536)
//! - `SHUTDOWN_TIMEOUT_SECS` - Grace period on shutdown (default: 5)
//! - `SHUTDOWN_ON_HANDLER_ERROR` - Stop after a handler error (default: false)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use dns_service_locate::router;
use dns_service_shared::shutdown::forward_os_signals;
use dns_service_shared::{
    init_logging, init_metrics, shutdown_channel, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service("locate");
    init_logging(&logging_config)?;

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env()?;
    info!(
        addr = %config.addr(),
        sector_id = config.sector_id,
        policy = ?config.shutdown_policy,
        "starting locate service"
    );

    let (signal, mut listener) = shutdown_channel();
    let _os_signals = forward_os_signals(signal.clone());

    let app = router(&config, signal).layer(TraceLayer::new_for_http());

    let tcp = tokio::net::TcpListener::bind(config.addr()).await?;
    info!(addr = %config.addr(), "listening on");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(
            tcp,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = stop_rx.await;
        })
        .await
    });

    tokio::select! {
        result = &mut server => {
            // Server stopped on its own.
            return Ok(result??);
        }
        reason = listener.recv() => {
            match reason {
                Some(reason) => info!(reason = %reason, "shutdown started"),
                None => warn!("shutdown channel closed, stopping"),
            }
        }
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
        Ok(result) => {
            result??;
            info!("shutdown complete");
        }
        Err(_) => {
            error!(
                timeout_secs = config.shutdown_timeout.as_secs(),
                "graceful shutdown timed out, aborting in-flight requests"
            );
            server.abort();
            return Err("could not stop server gracefully".into());
        }
    }

    Ok(())
}
