//! Phase 3 tests: shared snapshots, copy-on-write rebuilds, cancellation.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use follow_graph::engine::{CancelToken, FanoutParams, QueryEngine, RecommendParams};
use follow_graph::graph::{build_snapshot, GraphSnapshot, SnapshotHandle};
use follow_graph::types::{Distance, GraphError, Relationship, StudentId};

// ==================== Helpers ====================

fn chain(n: u64) -> (Vec<StudentId>, Vec<Relationship>) {
    let students: Vec<StudentId> = (0..n).collect();
    let rels = (0..n - 1)
        .map(|i| Relationship::accepted(i, i + 1, 1))
        .collect();
    (students, rels)
}

fn assert_send_sync<T: Send + Sync>() {}

// ==================== Shared Snapshot Tests ====================

#[test]
fn test_snapshot_is_send_sync() {
    assert_send_sync::<GraphSnapshot>();
    assert_send_sync::<SnapshotHandle>();
    assert_send_sync::<QueryEngine>();
    assert_send_sync::<CancelToken>();
}

#[test]
fn test_concurrent_queries_agree() {
    let (students, mut rels) = chain(200);
    for i in (0..190).step_by(7) {
        rels.push(Relationship::accepted(i, i + 10, 6));
    }
    let (snapshot, _) = build_snapshot(&students, &rels);
    let snapshot = Arc::new(snapshot);
    let engine = QueryEngine::new();

    let baseline: Vec<_> = (0..200)
        .step_by(13)
        .map(|t| {
            engine
                .connection(&snapshot, 0, t, &CancelToken::never())
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let snapshot = Arc::clone(&snapshot);
            thread::spawn(move || {
                let engine = QueryEngine::new();
                (0..200)
                    .step_by(13)
                    .map(|t| {
                        engine
                            .connection(&snapshot, 0, t, &CancelToken::never())
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), baseline);
    }
}

// ==================== Snapshot Handle Tests ====================

#[test]
fn test_handle_generations() {
    let (students, rels) = chain(5);
    let handle = SnapshotHandle::default();
    assert_eq!(handle.generation(), 1);
    assert_eq!(handle.current().vertex_count(), 0);

    let (generation, report) = handle.rebuild(&students, &rels);
    assert_eq!(generation, 2);
    assert_eq!(report.accepted, 4);
    assert_eq!(handle.current().edge_count(), 4);
    assert!(handle.is_stale(1));
    assert!(!handle.is_stale(2));
}

#[test]
fn test_pinned_snapshot_survives_rebuild() {
    let (students, mut rels) = chain(6);
    let (initial, _) = build_snapshot(&students, &rels);
    let handle = SnapshotHandle::new(initial);
    let engine = QueryEngine::new();

    let (old, old_generation) = handle.pinned();
    assert_eq!(
        engine.shortest_distance(&old, 0, 5, None).unwrap(),
        Distance::Reachable(5)
    );

    rels.push(Relationship::accepted(0, 5, 2));
    handle.rebuild(&students, &rels);

    // The pinned snapshot still answers with the old graph.
    assert_eq!(
        engine.shortest_distance(&old, 0, 5, None).unwrap(),
        Distance::Reachable(5)
    );
    assert_eq!(
        engine.shortest_distance(&handle.current(), 0, 5, None).unwrap(),
        Distance::Reachable(2)
    );
    assert!(handle.is_stale(old_generation));
}

#[test]
fn test_readers_during_rebuilds_see_whole_snapshots() {
    let (students, rels) = chain(50);
    let mut shortcut = rels.clone();
    shortcut.push(Relationship::accepted(0, 49, 3));

    let (initial, _) = build_snapshot(&students, &rels);
    let handle = SnapshotHandle::new(initial);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let engine = QueryEngine::new();
                for _ in 0..200 {
                    let snapshot = handle.current();
                    let d = engine.shortest_distance(&snapshot, 0, 49, None).unwrap();
                    assert!(
                        d == Distance::Reachable(49) || d == Distance::Reachable(3),
                        "unexpected {:?}",
                        d
                    );
                }
            });
        }
        s.spawn(|| {
            for i in 0..50 {
                if i % 2 == 0 {
                    handle.rebuild(&students, &shortcut);
                } else {
                    handle.rebuild(&students, &rels);
                }
            }
        });
    });

    assert_eq!(handle.generation(), 51);
}

// ==================== Cancellation Tests ====================

#[test]
fn test_cancelled_fanout_reports_cancellation() {
    let (students, rels) = chain(1000);
    let (snapshot, _) = build_snapshot(&students, &rels);
    let token = CancelToken::new();
    token.cancel();

    let err = QueryEngine::new()
        .fan_out(&snapshot, FanoutParams::new(0), &token)
        .unwrap_err();
    assert!(matches!(err, GraphError::Cancelled));
    assert!(err.is_cancellation());
}

#[test]
fn test_deadline_reports_distinctly_from_unreachable() {
    let (students, rels) = chain(1000);
    let (snapshot, _) = build_snapshot(&students, &rels);
    let token = CancelToken::new().with_deadline(Instant::now());

    let err = QueryEngine::new()
        .connection(&snapshot, 0, 999, &token)
        .unwrap_err();
    assert!(matches!(err, GraphError::DeadlineExceeded));

    let err = QueryEngine::new()
        .recommend(&snapshot, RecommendParams::new(0), &token)
        .unwrap_err();
    assert!(matches!(err, GraphError::DeadlineExceeded));
}

#[test]
fn test_generous_deadline_completes() {
    let (students, rels) = chain(1000);
    let (snapshot, _) = build_snapshot(&students, &rels);
    let token = CancelToken::new().with_timeout(Duration::from_secs(60));

    let result = QueryEngine::new()
        .fan_out(&snapshot, FanoutParams::new(0), &token)
        .unwrap();
    assert_eq!(result.reached.len(), 999);
    assert_eq!(result.reached.last().map(|r| r.distance), Some(999));
}

#[test]
fn test_cancel_from_another_thread() {
    let (students, rels) = chain(1000);
    let (snapshot, _) = build_snapshot(&students, &rels);
    let token = CancelToken::new();

    let remote = token.clone();
    thread::spawn(move || remote.cancel()).join().unwrap();

    let err = QueryEngine::new()
        .fan_out(&snapshot, FanoutParams::new(0), &token)
        .unwrap_err();
    assert!(matches!(err, GraphError::Cancelled));
}
