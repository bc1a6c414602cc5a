//! Process signals: SIGTERM / SIGINT stop the server, SIGHUP reloads the
//! configuration file.

use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

use crate::config::ConfigLoader;
use crate::state::AppState;

/// Resolves on the first SIGTERM or SIGINT.
pub async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    tracing::info!(signal = name, "Shutting down, draining connections");
}

/// Reload the configuration on every SIGHUP until the returned [`Notify`]
/// fires.
///
/// A file that fails to load or validate leaves the running configuration
/// untouched. The listen address is bound once and ignores reloads.
pub fn spawn_config_reload_handler(state: AppState, loader: Arc<ConfigLoader>) -> Arc<Notify> {
    let stop = Arc::new(Notify::new());
    let stopped = stop.clone();

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");
        loop {
            tokio::select! {
                _ = sighup.recv() => match loader.reload() {
                    Ok(loaded) => {
                        state.apply_config(loaded).await;
                        tracing::info!("Configuration reloaded");
                    }
                    Err(e) => tracing::error!(error = %e, "Configuration reload rejected"),
                },
                _ = stopped.notified() => break,
            }
        }
        tracing::debug!("Config reload handler stopped");
    });

    stop
}
