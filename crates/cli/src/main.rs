// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `whctl`: a thin HTTP client for the shuttle fleet daemon's ingestion
//! surface (§6). Not part of the orchestration engine itself — an operator
//! convenience for staging pallets, running one-off storage tasks, and
//! checking shuttle status by hand.

mod client;
mod commands;
mod error;

use clap::Parser;
use client::WarehouseClient;
use commands::Command;

#[derive(Debug, clap::Parser)]
#[command(name = "whctl", version, about = "Operator CLI for the shuttle fleet daemon")]
struct Cli {
    /// Base URL of the daemon's HTTP surface.
    #[arg(
        long,
        default_value_t = format!("http://127.0.0.1:{}", sf_config::settings::http_port()),
        env = "WHCTL_URL"
    )]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = WarehouseClient::new(cli.url);

    match cli.command.run(&client).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()));
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
