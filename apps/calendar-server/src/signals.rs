use anyhow::Result;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Cancel `token` on Ctrl+C or SIGTERM.
pub fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => tracing::info!(signal = name, "Shutdown signal received"),
            Err(e) => {
                tracing::warn!(error = %e, "Signal handler failed, shutting down");
            }
        }
        token.cancel();
    });
}

async fn wait_for_signal() -> Result<&'static str> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            Ok("ctrl_c")
        }
        result = sigterm() => result,
    }
}

#[cfg(unix)]
async fn sigterm() -> Result<&'static str> {
    let mut stream = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    stream.recv().await;
    Ok("sigterm")
}

#[cfg(not(unix))]
async fn sigterm() -> Result<&'static str> {
    std::future::pending().await
}
