// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use sf_daemon::config::DaemonConfig;
use tracing::error;

#[derive(Debug, clap::Parser)]
#[command(name = "sfd", about = "Shuttle fleet task orchestration daemon")]
struct Cli {
    #[command(flatten)]
    config: DaemonConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = sf_daemon::run(cli.config).await {
        error!("fatal: {err}");
        std::process::exit(1);
    }
}
