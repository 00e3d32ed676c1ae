// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommands for the daemon's HTTP ingestion surface (§6), one per
//! endpoint.

use crate::client::WarehouseClient;
use crate::error::CliResult;
use sf_core::{RackId, ShuttleId};
use sf_wire::http::{AutoModeItem, AutoModeRequest, ExecuteStorageRequest, RegisterRequest};

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Stage one or more pallets for automatic storage (`POST /auto-mode`).
    AutoMode {
        #[arg(long)]
        rack_id: String,
        #[arg(long)]
        pallet_type: String,
        /// Pallet identifiers to stage.
        #[arg(long = "pallet", required = true)]
        pallets: Vec<String>,
    },
    /// Register an inbound pallet (`POST /register`).
    Register {
        #[arg(long)]
        pallet_id: String,
        /// Extra pallet metadata as a JSON object. Defaults to `{}`.
        #[arg(long)]
        pallet_data: Option<String>,
    },
    /// Run an on-demand storage task for one idle shuttle (`POST /execute-storage`).
    ExecuteStorage {
        #[arg(long)]
        rack_id: String,
        #[arg(long)]
        pallet_type: String,
        #[arg(long)]
        shuttle_code: String,
    },
    /// List shuttles currently not idle (`GET /executing-shuttles`).
    ExecutingShuttles,
    /// Acknowledge a shuttle reported as executing (`POST /stop-executing`).
    StopExecuting {
        #[arg(long)]
        shuttle_id: String,
    },
    /// Set a PLC's active flag (`PUT /plc/{id}/active`).
    PlcActive {
        #[arg(long)]
        plc_id: String,
        /// `true` or `false`.
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}

impl Command {
    pub async fn run(self, client: &WarehouseClient) -> CliResult<serde_json::Value> {
        match self {
            Command::AutoMode { rack_id, pallet_type, pallets } => {
                let list_item = pallets.into_iter().map(serde_json::Value::String).collect();
                let request = AutoModeRequest::One(AutoModeItem {
                    rack_id: RackId::from_string(rack_id),
                    pallet_type,
                    list_item,
                });
                let response = client.auto_mode(&request).await?;
                Ok(serde_json::to_value(response).unwrap_or_default())
            }
            Command::Register { pallet_id, pallet_data } => {
                let pallet_data = match pallet_data {
                    Some(raw) => serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null),
                    None => serde_json::json!({}),
                };
                client.register(&RegisterRequest { pallet_id, pallet_data }).await
            }
            Command::ExecuteStorage { rack_id, pallet_type, shuttle_code } => {
                let request =
                    ExecuteStorageRequest { rack_id: RackId::from_string(rack_id), pallet_type, shuttle_code };
                let response = client.execute_storage(&request).await?;
                Ok(serde_json::to_value(response).unwrap_or_default())
            }
            Command::ExecutingShuttles => {
                let entries = client.executing_shuttles().await?;
                Ok(serde_json::to_value(entries).unwrap_or_default())
            }
            Command::StopExecuting { shuttle_id } => {
                client.stop_executing(&ShuttleId::from_string(shuttle_id)).await
            }
            Command::PlcActive { plc_id, active } => client.plc_active(&plc_id, active).await,
        }
    }
}
