// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(timestamp_ms: u64, ttl_ms: u64) -> ActivePathEntry {
    ActivePathEntry {
        shuttle_id: ShuttleId::from_string("sht-001"),
        qrs: vec!["X0002Y0001".into(), "X0001Y0001".into()],
        steps: vec![PathStep { qr_index: 1, direction: Direction::Left, action: Action::PickUp }],
        meta: PathMeta {
            task_id: Some(TaskId::from_string("tsk-1")),
            is_carrying: false,
            priority: 0,
            end_qr: "X0001Y0001".into(),
            end_floor_id: "138".into(),
            path_length: 2,
        },
        timestamp_ms,
        ttl_ms,
    }
}

#[test]
fn expires_after_ttl() {
    let e = entry(0, 600_000);
    assert!(!e.is_expired(599_999));
    assert!(e.is_expired(600_000));
}

#[test]
fn qr_at_resolves_index() {
    let e = entry(0, 600_000);
    assert_eq!(e.qr_at(&e.steps[0]), Some("X0001Y0001"));
}
