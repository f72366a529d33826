//! Multi-threaded scenario tests for the optimistic-concurrency transaction
//! manager. No async runtime: `std::thread::scope` only, since the manager
//! itself crosses no async boundaries.

use std::sync::Arc;
use std::thread;

use occdb::prelude::*;

fn seed(table: &InMemoryTable<BytesRecord>, primary_key: u64, data: &[u8], ts: u64) {
    table.insert(
        primary_key,
        TableRecord::new(table.table_id(), primary_key, BytesRecord::new(data.to_vec()), ts),
    );
}

/// Scenario 1: T1 reads R (ts=10); T2 commits R -> ts=11 before T1 commits.
/// Expect T1.commit -> false.
#[test]
fn scenario_read_only_consistent_snapshot() {
    let table = Arc::new(InMemoryTable::<BytesRecord>::new(TableId(0)));
    seed(&table, 1, b"v0", 10);

    let clock = Arc::new(AtomicClock::with_start(10));
    let mut t1 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);
    let mut t2 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);

    let ctx1 = TxnContext::new(TxnType(0), ThreadId(1));
    let ctx2 = TxnContext::new(TxnType(0), ThreadId(2));

    let record = table.get(1).unwrap();
    let (ok, _) = t1.select(
        ctx1,
        TableId(0),
        Arc::clone(&record),
        SelectKind::ReadOnly,
        AccessId(0),
        true,
    );
    assert!(ok);

    let (ok, outcome) = t2.select(
        ctx2,
        TableId(0),
        Arc::clone(&record),
        SelectKind::ReadWrite,
        AccessId(0),
        true,
    );
    assert!(ok);
    match outcome {
        AccessOutcome::Shadow(handle) => {
            t2.shadow_mut(&handle).unwrap().set_data(b"v1".to_vec());
        }
        _ => panic!("expected a shadow handle"),
    }
    assert!(t2.commit(ctx2, TxnParam::empty()), "T2 should commit first");

    assert!(
        !t1.commit(ctx1, TxnParam::empty()),
        "T1's snapshot is stale after T2's commit"
    );
}

/// Scenario 2: T1 updates R (snapshot ts=10, new payload X), no other
/// writer. Expect commit=true, new timestamp > 10, record.data = X.
#[test]
fn scenario_read_write_non_conflict_commits() {
    let table = Arc::new(InMemoryTable::<BytesRecord>::new(TableId(0)));
    seed(&table, 2, b"old", 10);

    let clock = Arc::new(AtomicClock::with_start(10));
    let mut t1 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);
    let ctx1 = TxnContext::new(TxnType(0), ThreadId(1));

    let record = table.get(2).unwrap();
    let (ok, outcome) = t1.select(
        ctx1,
        TableId(0),
        Arc::clone(&record),
        SelectKind::ReadWrite,
        AccessId(0),
        true,
    );
    assert!(ok);
    match outcome {
        AccessOutcome::Shadow(handle) => {
            t1.shadow_mut(&handle).unwrap().set_data(b"new".to_vec());
        }
        _ => panic!("expected a shadow handle"),
    }

    assert!(t1.commit(ctx1, TxnParam::empty()));

    let after = table.get(2).unwrap();
    assert!(after.content().get_timestamp() > 10);
    assert_eq!(after.content().snapshot().data(), b"new");
}

/// Scenario 3: T1 and T2 both ReadWrite R from the same snapshot ts.
/// Exactly one commits true; the other returns false and leaves R
/// untouched.
#[test]
fn scenario_two_writers_same_record_exactly_one_wins() {
    let table = Arc::new(InMemoryTable::<BytesRecord>::new(TableId(0)));
    seed(&table, 3, b"base", 10);
    let clock = Arc::new(AtomicClock::with_start(10));

    let barrier = Arc::new(std::sync::Barrier::new(2));

    let results: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = [(ThreadId(1), b"from-t1".to_vec()), (ThreadId(2), b"from-t2".to_vec())]
            .into_iter()
            .map(|(thread_id, new_data)| {
                let table = Arc::clone(&table);
                let clock = Arc::clone(&clock);
                let barrier = Arc::clone(&barrier);
                scope.spawn(move || {
                    let mut txn = TransactionManager::new(EngineConfig::default(), HeapAllocator, clock, NullLogger);
                    let ctx = TxnContext::new(TxnType(0), thread_id);
                    let record = table.get(3).unwrap();
                    let (ok, outcome) = txn.select(
                        ctx,
                        TableId(0),
                        record,
                        SelectKind::ReadWrite,
                        AccessId(0),
                        true,
                    );
                    assert!(ok);
                    match outcome {
                        AccessOutcome::Shadow(handle) => {
                            txn.shadow_mut(&handle).unwrap().set_data(new_data);
                        }
                        _ => panic!("expected a shadow handle"),
                    }
                    barrier.wait();
                    txn.commit(ctx, TxnParam::empty())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let committed = results.iter().filter(|&&ok| ok).count();
    assert_eq!(committed, 1, "exactly one writer should win: {results:?}");
}

/// Scenario 4: T1 inserts (pk=7, val=A) and commits. T2 starts after T1
/// commits, reads pk=7 -> sees val=A, is_visible=true.
#[test]
fn scenario_insert_then_read_by_another_txn() {
    let table = Arc::new(InMemoryTable::<BytesRecord>::new(TableId(0)));
    let clock = Arc::new(AtomicClock::new());

    let mut t1 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);
    let ctx1 = TxnContext::new(TxnType(0), ThreadId(1));
    assert!(t1.insert(ctx1, &table, 7, BytesRecord::new(b"A".to_vec())));
    assert!(t1.commit(ctx1, TxnParam::empty()));

    let mut t2 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);
    let ctx2 = TxnContext::new(TxnType(0), ThreadId(2));
    let record = table.get(7).unwrap();
    let (ok, outcome) = t2.select(
        ctx2,
        TableId(0),
        Arc::clone(&record),
        SelectKind::ReadOnly,
        AccessId(0),
        true,
    );
    assert!(ok);
    match outcome {
        AccessOutcome::Snapshot(payload) => {
            assert!(payload.is_visible());
            assert_eq!(payload.data(), b"A");
        }
        _ => panic!("expected a snapshot"),
    }
    assert!(t2.commit(ctx2, TxnParam::empty()));
}

/// Scenario 5: T1 deletes pk=7 and commits. T2, which read pk=7 (observing
/// is_visible=true) before T1's commit, detects the timestamp change at its
/// own commit and fails.
#[test]
fn scenario_delete_observed_by_concurrent_reader() {
    let table = Arc::new(InMemoryTable::<BytesRecord>::new(TableId(0)));
    seed(&table, 7, b"A", 10);
    let clock = Arc::new(AtomicClock::with_start(10));

    let mut t1 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);
    let mut t2 = TransactionManager::new(EngineConfig::default(), HeapAllocator, Arc::clone(&clock), NullLogger);
    let ctx1 = TxnContext::new(TxnType(0), ThreadId(1));
    let ctx2 = TxnContext::new(TxnType(0), ThreadId(2));

    let record = table.get(7).unwrap();
    let (ok, outcome) = t2.select(
        ctx2,
        TableId(0),
        Arc::clone(&record),
        SelectKind::ReadOnly,
        AccessId(0),
        true,
    );
    assert!(ok);
    match outcome {
        AccessOutcome::Snapshot(payload) => assert!(payload.is_visible()),
        _ => panic!("expected a snapshot"),
    }

    let (ok, _) = t1.select(
        ctx1,
        TableId(0),
        Arc::clone(&record),
        SelectKind::DeleteOnly,
        AccessId(0),
        true,
    );
    assert!(ok);
    assert!(t1.commit(ctx1, TxnParam::empty()));

    assert!(!t2.commit(ctx2, TxnParam::empty()));
}

/// Scenario 6: T1 touches R_a then R_b; T2 touches R_b then R_a. Both
/// commit without deadlock because sorting the access log imposes the same
/// acquisition order regardless of per-thread touch order.
#[test]
fn scenario_ordered_acquisition_avoids_deadlock() {
    let table = Arc::new(InMemoryTable::<BytesRecord>::new(TableId(0)));
    seed(&table, 100, b"a", 10);
    seed(&table, 200, b"b", 10);
    let clock = Arc::new(AtomicClock::with_start(10));
    let barrier = Arc::new(std::sync::Barrier::new(2));

    let orders: [[u64; 2]; 2] = [[100, 200], [200, 100]];

    let results: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = orders
            .into_iter()
            .enumerate()
            .map(|(i, keys)| {
                let table = Arc::clone(&table);
                let clock = Arc::clone(&clock);
                let barrier = Arc::clone(&barrier);
                scope.spawn(move || {
                    let mut txn = TransactionManager::new(EngineConfig::default(), HeapAllocator, clock, NullLogger);
                    let ctx = TxnContext::new(TxnType(0), ThreadId(i as u32 + 1));
                    for key in keys {
                        let record = table.get(key).unwrap();
                        let (ok, _) = txn.select(
                            ctx,
                            TableId(0),
                            record,
                            SelectKind::ReadOnly,
                            AccessId(0),
                            true,
                        );
                        assert!(ok);
                    }
                    barrier.wait();
                    txn.commit(ctx, TxnParam::empty())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, vec![true, true], "both read-only commits should succeed without deadlock");
}
