// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn infer_rtl_when_end_before_pickup() {
    assert_eq!(RowDirection::infer(1, 5), RowDirection::Rtl);
}

#[test]
fn infer_ltr_when_end_at_or_after_pickup() {
    assert_eq!(RowDirection::infer(5, 5), RowDirection::Ltr);
    assert_eq!(RowDirection::infer(9, 5), RowDirection::Ltr);
}

#[test]
fn lock_starts_empty() {
    let lock = RowDirectionLock::new(RowDirection::Ltr, 0);
    assert!(lock.is_empty());
}

#[test]
fn lock_not_empty_after_holder_added() {
    let mut lock = RowDirectionLock::new(RowDirection::Ltr, 0);
    lock.holders.insert(ShuttleId::from_string("sht-001"));
    assert!(!lock.is_empty());
}
