//! Process-wide shutdown signal.
//!
//! A single-slot channel shared by every request task and the OS signal
//! listener. Sending never blocks: while a request is already waiting in the
//! slot, further requests are dropped.

use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// Why the service is stopping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT, SIGTERM or Ctrl-C.
    Signal,
    /// A handler failed and the app is configured to stop on failure.
    HandlerFailure(String),
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal => write!(f, "signal received"),
            ShutdownReason::HandlerFailure(err) => write!(f, "handler failure: {}", err),
        }
    }
}

/// Sending half, cheap to clone into every request task.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: mpsc::Sender<ShutdownReason>,
}

/// Receiving half, owned by the run loop.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: mpsc::Receiver<ShutdownReason>,
}

/// Create a connected signal/listener pair.
pub fn shutdown_channel() -> (ShutdownSignal, ShutdownListener) {
    let (tx, rx) = mpsc::channel(1);
    (ShutdownSignal { tx }, ShutdownListener { rx })
}

impl ShutdownSignal {
    /// Ask the service to stop.
    ///
    /// Returns `false` when the request was dropped because one is already
    /// pending or the listener is gone.
    pub fn request(&self, reason: ShutdownReason) -> bool {
        match self.tx.try_send(reason) {
            Ok(()) => true,
            Err(TrySendError::Full(reason)) => {
                tracing::debug!(%reason, "shutdown already pending, dropping request");
                false
            }
            Err(TrySendError::Closed(reason)) => {
                tracing::debug!(%reason, "shutdown listener gone, dropping request");
                false
            }
        }
    }
}

impl ShutdownListener {
    /// Wait for the next shutdown request.
    ///
    /// Returns `None` once every [`ShutdownSignal`] has been dropped.
    pub async fn recv(&mut self) -> Option<ShutdownReason> {
        self.rx.recv().await
    }

    /// Take a pending request without waiting.
    pub fn try_recv(&mut self) -> Option<ShutdownReason> {
        self.rx.try_recv().ok()
    }
}

/// Wait for SIGTERM, SIGINT or Ctrl-C.
pub async fn wait_for_os_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
            _ = tokio::signal::ctrl_c() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Spawn a task that turns OS signals into a shutdown request.
pub fn forward_os_signals(signal: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_os_signal().await {
            Ok(()) => {
                signal.request(ShutdownReason::Signal);
            }
            Err(e) => tracing::error!(error = %e, "failed to install signal handlers"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_request_is_delivered() {
        let (signal, mut listener) = shutdown_channel();
        assert!(signal.request(ShutdownReason::HandlerFailure("boom".into())));

        let reason = listener.recv().await.unwrap();
        assert_eq!(reason, ShutdownReason::HandlerFailure("boom".into()));
    }

    #[test]
    fn repeated_requests_are_dropped_without_blocking() {
        let (signal, mut listener) = shutdown_channel();
        let other = signal.clone();

        assert!(signal.request(ShutdownReason::Signal));
        assert!(!other.request(ShutdownReason::HandlerFailure("late".into())));

        assert_eq!(listener.try_recv(), Some(ShutdownReason::Signal));
        assert_eq!(listener.try_recv(), None);

        // slot is free again once consumed
        assert!(other.request(ShutdownReason::Signal));
    }

    #[test]
    fn request_after_listener_dropped_is_ignored() {
        let (signal, listener) = shutdown_channel();
        drop(listener);
        assert!(!signal.request(ShutdownReason::Signal));
    }

    #[tokio::test]
    async fn listener_ends_when_signals_dropped() {
        let (signal, mut listener) = shutdown_channel();
        drop(signal);
        assert_eq!(listener.recv().await, None);
    }

    #[test]
    fn reason_display() {
        assert_eq!(ShutdownReason::Signal.to_string(), "signal received");
        assert!(ShutdownReason::HandlerFailure("x".into())
            .to_string()
            .contains("handler failure"));
    }
}
