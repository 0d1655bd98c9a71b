use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;

/// Resolves on Ctrl+C or SIGTERM. If a handler cannot be installed the
/// corresponding branch never fires and the other one still does.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Drives `server` to completion, but once `shutdown_started` is notified it
/// gets at most `timeout` to drain. Returns `None` when the deadline cut the
/// drain short.
pub async fn with_drain_deadline<S, T>(
    server: S,
    shutdown_started: Arc<Notify>,
    timeout: Duration,
) -> Option<T>
where
    S: Future<Output = T>,
{
    tokio::pin!(server);

    tokio::select! {
        out = &mut server => return Some(out),
        _ = shutdown_started.notified() => {}
    }

    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "allowing connections to drain"
    );

    match tokio::time::timeout(timeout, server).await {
        Ok(out) => Some(out),
        Err(_) => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "connections still open after drain timeout, forcing shutdown"
            );
            None
        }
    }
}
