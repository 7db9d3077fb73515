// Signal handling module
//
// Supported signals:
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)
// - SIGHUP:  acknowledged and ignored (configuration is immutable at
//            runtime; restart the process to apply changes)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Spawn the background task that listens for process signals and notifies
/// the accept loop on shutdown.
#[cfg(unix)]
pub fn spawn_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");
        let mut sighup = signal(SignalKind::hangup()).expect("Failed to register SIGHUP handler");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    logger::log_shutdown("SIGTERM");
                    shutdown.notify_waiters();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_shutdown("SIGINT");
                    shutdown.notify_waiters();
                    break;
                }

                _ = sighup.recv() => {
                    logger::log_warning(
                        "SIGHUP ignored: configuration is immutable at runtime, restart to apply changes"
                    );
                }
            }
        }
    });
}

/// Windows fallback: only Ctrl+C is supported
#[cfg(not(unix))]
pub fn spawn_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown("Ctrl+C");
            shutdown.notify_waiters();
        }
    });
}
