//! Tests for the value cell

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tagfd_protocol::{DataType, Quality, TagRecord, TagValue};

use super::*;

fn cell_with(dtype: DataType, timestamp: u64) -> Arc<TagCell> {
    Arc::new(TagCell::new(
        TagRecord::initial(dtype, timestamp).unwrap(),
    ))
}

fn record(value: u32, timestamp: u64) -> TagRecord {
    TagRecord::new(TagValue::Uint32(value), timestamp, Quality::GOOD)
}

#[test]
fn test_commit_overwrites_in_full() {
    let cell = cell_with(DataType::Uint32, 100);
    cell.commit(&record(7, 1000)).unwrap();

    let stored = cell.snapshot();
    assert_eq!(stored.value, TagValue::Uint32(7));
    assert_eq!(stored.timestamp, 1000);
    assert_eq!(stored.quality, Quality::GOOD);
    assert_eq!(cell.current_stamp(), 1000);
}

#[test]
fn test_commit_rejects_type_change() {
    let cell = cell_with(DataType::Real64, 100);
    let err = cell.commit(&record(1, 1000)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::TypeMismatch {
            expected: DataType::Real64,
            got: DataType::Uint32
        }
    ));
    // The cell is untouched by the failed commit.
    assert_eq!(cell.current_stamp(), 100);
    assert_eq!(cell.snapshot().value, TagValue::Real64(0.0));
}

#[test]
fn test_commit_rejects_equal_and_older_timestamps() {
    let cell = cell_with(DataType::Uint32, 5000);

    for stale in [5000, 4999, 0] {
        let err = cell.commit(&record(1, stale)).unwrap_err();
        assert!(
            matches!(err, CoreError::StaleTimestamp { current: 5000, offered } if offered == stale)
        );
    }
    assert_eq!(cell.current_stamp(), 5000);

    cell.commit(&record(1, 5001)).unwrap();
    assert_eq!(cell.current_stamp(), 5001);
}

#[test]
fn test_timestamps_strictly_increase_across_commits() {
    let cell = cell_with(DataType::Uint32, 0);
    let mut previous = 0;
    for ts in [10, 11, 500, 501] {
        cell.commit(&record(0, ts)).unwrap();
        assert!(cell.current_stamp() > previous);
        previous = cell.current_stamp();
    }
}

#[test]
fn test_wait_returns_immediately_when_already_changed() {
    let cell = cell_with(DataType::Uint32, 100);
    let cancel = CancelToken::for_cell(&cell);
    // last_seen of zero differs from the stored stamp, so no suspension.
    assert_eq!(cell.wait_for_change(0, &cancel), WaitOutcome::Changed);
}

#[test]
fn test_wait_wakes_on_commit() {
    let cell = cell_with(DataType::Uint32, 100);
    let cancel = CancelToken::for_cell(&cell);

    let waiter = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || cell.wait_for_change(100, &cancel))
    };
    // Let the waiter block on the condition.
    thread::sleep(Duration::from_millis(50));

    cell.commit(&record(9, 101)).unwrap();
    assert_eq!(waiter.join().unwrap(), WaitOutcome::Changed);
}

#[test]
fn test_wait_cancellation_wakes_promptly() {
    let cell = cell_with(DataType::Uint32, 100);
    let cancel = CancelToken::for_cell(&cell);

    let waiter = {
        let cell = Arc::clone(&cell);
        let cancel = cancel.clone();
        thread::spawn(move || cell.wait_for_change(100, &cancel))
    };
    thread::sleep(Duration::from_millis(50));

    cancel.cancel();
    assert_eq!(waiter.join().unwrap(), WaitOutcome::Cancelled);
    assert!(cancel.is_cancelled());

    // A cleared token can block again.
    cancel.clear();
    assert!(!cancel.is_cancelled());
}

#[test]
fn test_commit_wakes_all_waiters() {
    let cell = cell_with(DataType::Uint32, 100);

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let cancel = CancelToken::for_cell(&cell);
            thread::spawn(move || cell.wait_for_change(100, &cancel))
        })
        .collect();
    thread::sleep(Duration::from_millis(50));

    cell.commit(&record(1, 101)).unwrap();
    for waiter in waiters {
        assert_eq!(waiter.join().unwrap(), WaitOutcome::Changed);
    }
}

#[test]
fn test_snapshot_is_never_torn() {
    // A reader must never observe a record mixing fields of two commits.
    let cell = cell_with(DataType::Uint64, 0);
    let writer = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || {
            for ts in 1..=1000u64 {
                let rec = TagRecord::new(TagValue::Uint64(ts * 3), ts, Quality::GOOD);
                cell.commit(&rec).unwrap();
            }
        })
    };

    loop {
        let snap = cell.snapshot();
        if snap.timestamp > 0 {
            match snap.value {
                TagValue::Uint64(v) => assert_eq!(v, snap.timestamp * 3, "torn read"),
                other => panic!("wrong variant: {other:?}"),
            }
        }
        if snap.timestamp == 1000 {
            break;
        }
    }
    writer.join().unwrap();
}
