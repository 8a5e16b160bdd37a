use tokio::signal;
use tracing::{info, warn};

/// Resolves once the process receives Ctrl+C or SIGTERM, so the HTTP server can drain.
pub(crate) async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl+C: {:#?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Unable to listen for SIGTERM: {:#?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received Ctrl+C, shutting down jmapgate"),
        _ = terminate => info!("Received SIGTERM, shutting down jmapgate"),
    };
}
