// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestration daemon: Staging Pipeline, Scheduler Worker, Dispatcher,
//! Event Listener, Conflict Resolver, and the HTTP ingestion surface, all
//! sharing one `AppState` (§4.6–§4.10, §6).

pub mod conflict_resolver;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event_listener;
pub mod http;
pub mod janitor;
pub mod mission_publish;
pub mod scheduler;
pub mod shutdown;
pub mod staging;
pub mod state;

#[cfg(test)]
mod test_support;

use config::DaemonConfig;
use error::DaemonResult;
use state::AppState;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Composition root: connects every backing service, spawns the five
/// supervised loops, serves the HTTP surface, and blocks until a shutdown
/// signal arrives and every loop has drained (§5).
pub async fn run(config: DaemonConfig) -> DaemonResult<()> {
    let drain_timeout = config.drain_timeout();
    let http_port = config.http_port;

    let (state, mqtt_client, mqtt_eventloop) = AppState::connect(config).await?;

    let janitor_cancel = CancellationToken::new();
    let dispatcher_cancel = CancellationToken::new();
    let scheduler_cancel = CancellationToken::new();
    let event_listener_cancel = CancellationToken::new();
    let http_cancel = CancellationToken::new();

    let janitor = janitor::spawn(state.clone(), janitor_cancel.clone());
    let dispatcher = dispatcher::spawn(state.clone(), dispatcher_cancel.clone());
    let scheduler = scheduler::spawn(state.clone(), scheduler_cancel.clone());
    let event_listener =
        event_listener::spawn(state.clone(), mqtt_client, mqtt_eventloop, event_listener_cancel.clone());

    let router = http::build_router(state.clone());
    let listener = TcpListener::bind(("0.0.0.0", http_port)).await.map_err(|err| {
        error::DaemonError::StateInconsistency(format!("failed to bind HTTP listener: {err}"))
    })?;
    tracing::info!(port = http_port, "daemon listening");

    let server = tokio::spawn(async move {
        if let Err(err) =
            axum::serve(listener, router).with_graceful_shutdown(http_cancel.clone().cancelled_owned()).await
        {
            tracing::error!(error = %err, "http server exited with an error");
        }
    });

    shutdown::wait_for_signal().await;

    // §5: stop the path janitor, the dispatcher loop, and the scheduler
    // loop, in that order, each drained before the next is cancelled. The
    // event listener and HTTP server aren't named in that ordering, so they
    // drain together afterward, ahead of the broker connection closing with
    // the process.
    tracing::info!("shutdown: stopping path janitor");
    janitor_cancel.cancel();
    shutdown::drain(vec![janitor], drain_timeout).await;

    tracing::info!("shutdown: stopping dispatcher");
    dispatcher_cancel.cancel();
    shutdown::drain(vec![dispatcher], drain_timeout).await;

    tracing::info!("shutdown: stopping scheduler");
    scheduler_cancel.cancel();
    shutdown::drain(vec![scheduler], drain_timeout).await;

    tracing::info!("shutdown: draining event listener and http server");
    event_listener_cancel.cancel();
    http_cancel.cancel();
    shutdown::drain(vec![event_listener, server], drain_timeout).await;

    Ok(())
}
