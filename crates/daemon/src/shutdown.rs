// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful shutdown (§5): on SIGINT/SIGTERM, stop the path janitor, the
//! dispatcher loop, and the scheduler loop, in that order, then allow
//! in-flight handlers to drain before the process closes its broker
//! connections.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Waits for either SIGINT or SIGTERM. The caller drives the actual shutdown
/// sequence afterward — janitor, then dispatcher, then scheduler, each
/// cancelled and drained before the next, per §5 — rather than this
/// function cancelling anything itself.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}

/// Awaits every supervised loop's `JoinHandle`, in the order they were
/// spawned, up to `timeout`. A handle still running past the deadline is
/// abandoned (its task keeps running detached) rather than blocking process
/// exit indefinitely — §5 calls for draining in-flight handlers, not waiting
/// forever on one that's stuck.
pub async fn drain(handles: Vec<JoinHandle<()>>, timeout: Duration) {
    let all = async {
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "background loop panicked during shutdown");
            }
        }
    };

    if tokio::time::timeout(timeout, all).await.is_err() {
        tracing::warn!(timeout_ms = timeout.as_millis() as u64, "drain timed out, exiting anyway");
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
