// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_commander_records_floor_commands() {
    let commander = FakeLifterCommander::new();
    commander.command_to_floor("L1", "139").await.expect("command");
    let calls = commander.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], RecordedLifterCommand { lifter_id: "L1".to_string(), floor_id: "139".to_string() });
}
