//! Process shutdown signal.

use anyhow::Result;

/// Resolve once the process is asked to stop.
///
/// Unix: SIGTERM or SIGINT. Elsewhere: Ctrl+C.
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?; // Ctrl+C
        let reason = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv()  => "SIGINT",
        };
        tracing::debug!(reason, "shutdown signal received");
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::debug!(reason = "ctrl_c", "shutdown signal received");
        Ok(())
    }
}
