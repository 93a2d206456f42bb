use tokio::sync::broadcast;

use crate::shutdown::{ShutdownReceiver, ShutdownSender};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

#[cfg(unix)]
async fn terminate_requested() {
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => {
            tracing::warn!("Failed to register SIGTERM handler: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_requested() {
    std::future::pending::<()>().await;
}

/// Fires `shutdown_tx` on Ctrl+C or SIGTERM so the replay stops and flushes
/// its last display line. Exits quietly when shutdown comes from elsewhere.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();
        let interrupted = tokio::select! {
            _ = shutdown_rx.recv() => false,
            _ = tokio::signal::ctrl_c() => true,
            () = terminate_requested() => true,
        };
        if interrupted {
            tracing::info!("Interrupted; stopping replay");
            drop(shutdown_tx.send(()));
        }
    })
}
