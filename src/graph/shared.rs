//! Shared handle to the current snapshot with generation tracking.
//!
//! Readers take an `Arc` to whichever snapshot is current and keep it for the
//! duration of their query. A rebuild publishes a new snapshot and bumps the
//! generation; snapshots already handed out are never touched.

use std::sync::{Arc, RwLock};

use crate::types::{Relationship, StudentId};

use super::builder::{build_snapshot, BuildReport};
use super::snapshot::GraphSnapshot;

struct Published {
    snapshot: Arc<GraphSnapshot>,
    generation: u64,
}

/// Copy-on-write holder of the current [`GraphSnapshot`].
pub struct SnapshotHandle {
    inner: RwLock<Published>,
}

impl SnapshotHandle {
    /// Wrap an initial snapshot as generation 1.
    pub fn new(snapshot: GraphSnapshot) -> Self {
        Self {
            inner: RwLock::new(Published {
                snapshot: Arc::new(snapshot),
                generation: 1,
            }),
        }
    }

    /// The snapshot current at the time of the call.
    pub fn current(&self) -> Arc<GraphSnapshot> {
        self.pinned().0
    }

    /// The current snapshot together with its generation.
    pub fn pinned(&self) -> (Arc<GraphSnapshot>, u64) {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        (Arc::clone(&guard.snapshot), guard.generation)
    }

    /// Generation of the current snapshot. Starts at 1.
    pub fn generation(&self) -> u64 {
        self.pinned().1
    }

    /// Whether `generation` is older than the current one.
    pub fn is_stale(&self, generation: u64) -> bool {
        generation < self.generation()
    }

    /// Replace the current snapshot, returning the new generation.
    pub fn publish(&self, snapshot: GraphSnapshot) -> u64 {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.snapshot = snapshot;
        guard.generation += 1;
        log::debug!("published snapshot generation {}", guard.generation);
        guard.generation
    }

    /// Build a snapshot from fresh inputs and publish it.
    ///
    /// The build runs without holding the lock.
    pub fn rebuild(
        &self,
        students: &[StudentId],
        relationships: &[Relationship],
    ) -> (u64, BuildReport) {
        let (snapshot, report) = build_snapshot(students, relationships);
        (self.publish(snapshot), report)
    }
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self::new(GraphSnapshot::empty())
    }
}
