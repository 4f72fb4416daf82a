//! Listener setup and coordinated shutdown for both services.

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// How long in-flight requests get to finish after the shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serve the entry and resolver routers until SIGINT, then drain both
/// listeners within the grace period.
pub async fn run(
    entry_addr: &str,
    resolver_addr: &str,
    entry_app: Router,
    resolver_app: Router,
) -> Result<()> {
    let entry_listener = TcpListener::bind(entry_addr)
        .await
        .with_context(|| format!("binding entry listener on {entry_addr}"))?;
    let resolver_listener = TcpListener::bind(resolver_addr)
        .await
        .with_context(|| format!("binding resolver listener on {resolver_addr}"))?;

    info!("entry service listening on {}", entry_listener.local_addr()?);
    info!(
        "resolver service listening on {}",
        resolver_listener.local_addr()?
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let mut entry_task = tokio::spawn(
        axum::serve(entry_listener, entry_app.layer(TraceLayer::new_for_http()))
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()))
            .into_future(),
    );
    let mut resolver_task = tokio::spawn(
        axum::serve(
            resolver_listener,
            resolver_app.layer(TraceLayer::new_for_http()),
        )
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .into_future(),
    );

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for shutdown signal")?;
            info!("shutdown signal received");
        }
        result = &mut entry_task => {
            result.context("entry server task")?.context("entry server failed")?;
            anyhow::bail!("entry server exited unexpectedly");
        }
        result = &mut resolver_task => {
            result.context("resolver server task")?.context("resolver server failed")?;
            anyhow::bail!("resolver server exited unexpectedly");
        }
    }

    let _ = shutdown_tx.send(());

    match tokio::time::timeout(
        SHUTDOWN_GRACE,
        futures::future::try_join(entry_task, resolver_task),
    )
    .await
    {
        Err(_) => warn!(
            "grace period of {:?} expired before in-flight requests finished",
            SHUTDOWN_GRACE
        ),
        Ok(Err(join_error)) => warn!(error = %join_error, "server task failed during shutdown"),
        Ok(Ok((entry_result, resolver_result))) => {
            if let Err(error) = entry_result {
                warn!(%error, "entry server shutdown error");
            }
            if let Err(error) = resolver_result {
                warn!(%error, "resolver server shutdown error");
            }
            info!("both listeners drained");
        }
    }

    Ok(())
}

async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<()>) {
    // Either the signal arrives or the sender is dropped; both mean stop.
    let _ = shutdown_rx.changed().await;
}
