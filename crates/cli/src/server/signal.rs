use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancels `token` on SIGINT or SIGTERM.
pub async fn cancel_on_signal(token: CancellationToken) {
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Received SIGINT, initiating shutdown..."),
            Err(e) => error!(error = %e, "Failed to listen for SIGINT"),
        },
        _ = wait_for_sigterm() => info!("Received SIGTERM, initiating shutdown..."),
        _ = token.cancelled() => return,
    }
    token.cancel();
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!(error = %e, "Failed to register SIGTERM handler");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
