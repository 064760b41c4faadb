//! Dijkstra shortest paths over a [`GraphSnapshot`].
//!
//! The frontier is a binary heap keyed by `(distance, vertex)`, so among equal
//! tentative distances the smaller student id settles first. Together with
//! id-ordered adjacency this makes every result independent of input order.
//!
//! Parent pointers are stored instead of per-vertex paths; the path is
//! reconstructed once the target settles.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use crate::graph::GraphSnapshot;
use crate::types::{GraphError, GraphResult, StudentId, CANCEL_CHECK_INTERVAL};

use super::cancel::CancelToken;

/// A tentative label on the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    distance: u64,
    vertex: StudentId,
    hops: u32,
}

impl Ord for FrontierEntry {
    // Reversed: BinaryHeap pops the maximum, we want the minimum.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
            .then_with(|| other.hops.cmp(&self.hops))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Counts frontier pops and polls the cancel token every
/// `CANCEL_CHECK_INTERVAL` of them.
struct CancelGate<'a> {
    token: &'a CancelToken,
    pops: u32,
}

impl<'a> CancelGate<'a> {
    fn new(token: &'a CancelToken) -> Self {
        Self { token, pops: 0 }
    }

    fn tick(&mut self) -> GraphResult<()> {
        let due = self.pops % CANCEL_CHECK_INTERVAL == 0;
        self.pops = self.pops.wrapping_add(1);
        if due {
            if let Err(e) = self.token.check() {
                log::warn!("shortest-path query aborted after {} pops: {}", self.pops, e);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// A settled shortest path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Total weight of the path.
    pub distance: u64,
    /// Vertex ids from source to target inclusive.
    pub path: Vec<StudentId>,
}

impl PathResult {
    /// Number of edges on the path.
    pub fn hops(&self) -> u32 {
        self.path.len().saturating_sub(1) as u32
    }
}

/// A vertex reached by a bounded fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reached {
    pub vertex: StudentId,
    /// Minimum weight within the bound.
    pub distance: u64,
    /// Edge count of the path realising `distance`.
    pub hops: u32,
}

/// Limits on a bounded fan-out. All `None` means the whole reachable set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutBound {
    /// Maximum cumulative weight (inclusive).
    pub max_weight: Option<u64>,
    /// Maximum number of edges on a path (inclusive).
    pub max_hops: Option<u32>,
    /// Stop after this many vertices have settled, source included.
    pub limit: Option<usize>,
}

fn ensure_vertex(snapshot: &GraphSnapshot, id: StudentId) -> GraphResult<()> {
    if snapshot.contains(id) {
        Ok(())
    } else {
        Err(GraphError::VertexNotFound(id))
    }
}

/// Minimum-weight path from `source` to `target`.
///
/// Stops as soon as the target settles. With `max_weight`, paths heavier
/// than the cutoff are treated as absent. Returns `Ok(None)` when the
/// target is unreachable.
pub fn single_target(
    snapshot: &GraphSnapshot,
    source: StudentId,
    target: StudentId,
    max_weight: Option<u64>,
    token: &CancelToken,
) -> GraphResult<Option<PathResult>> {
    ensure_vertex(snapshot, source)?;
    ensure_vertex(snapshot, target)?;

    if source == target {
        return Ok(Some(PathResult {
            distance: 0,
            path: vec![source],
        }));
    }

    let mut gate = CancelGate::new(token);
    let mut dist: HashMap<StudentId, u64> = HashMap::new();
    let mut parent: HashMap<StudentId, StudentId> = HashMap::new();
    let mut settled: HashSet<StudentId> = HashSet::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0);
    heap.push(FrontierEntry {
        distance: 0,
        vertex: source,
        hops: 0,
    });

    while let Some(entry) = heap.pop() {
        gate.tick()?;

        if !settled.insert(entry.vertex) {
            continue;
        }
        if max_weight.is_some_and(|max| entry.distance > max) {
            break;
        }
        if entry.vertex == target {
            log::debug!(
                "settled target {} from {} after {} vertices",
                target,
                source,
                settled.len()
            );
            return Ok(Some(PathResult {
                distance: entry.distance,
                path: reconstruct_path(&parent, source, target),
            }));
        }

        for edge in snapshot.neighbors(entry.vertex) {
            if settled.contains(&edge.target) {
                continue;
            }
            let candidate = entry.distance.saturating_add(u64::from(edge.weight));
            let improves = dist
                .get(&edge.target)
                .map_or(true, |&current| candidate < current);
            if improves {
                dist.insert(edge.target, candidate);
                parent.insert(edge.target, entry.vertex);
                heap.push(FrontierEntry {
                    distance: candidate,
                    vertex: edge.target,
                    hops: entry.hops + 1,
                });
            }
        }
    }

    Ok(None)
}

/// Walk parent pointers from `target` back to `source`.
fn reconstruct_path(
    parent: &HashMap<StudentId, StudentId>,
    source: StudentId,
    target: StudentId,
) -> Vec<StudentId> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match parent.get(&current) {
            Some(&p) => {
                path.push(p);
                current = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// All vertices reachable from `source` within `bound`, in settle order.
///
/// The source itself comes first with distance 0. Under a hop bound the
/// reported distance is the lightest path that fits the bound, which may
/// be heavier than the unbounded shortest path.
pub fn bounded_fanout(
    snapshot: &GraphSnapshot,
    source: StudentId,
    bound: FanoutBound,
    token: &CancelToken,
) -> GraphResult<Vec<Reached>> {
    ensure_vertex(snapshot, source)?;

    let mut gate = CancelGate::new(token);
    let mut reached: Vec<Reached> = Vec::new();
    // Fewest hops among labels already expanded per vertex.
    let mut expanded: HashMap<StudentId, u32> = HashMap::new();
    // Lightest label pushed per vertex: (distance, hops).
    let mut tentative: HashMap<StudentId, (u64, u32)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    // Without a hop bound any earlier label dominates; with one, an earlier
    // label dominates only if it used no more hops.
    let dominated_by = |seen_hops: u32, hops: u32| bound.max_hops.is_none() || seen_hops <= hops;

    tentative.insert(source, (0, 0));
    heap.push(FrontierEntry {
        distance: 0,
        vertex: source,
        hops: 0,
    });

    while let Some(entry) = heap.pop() {
        gate.tick()?;

        match expanded.get(&entry.vertex) {
            Some(&seen) if dominated_by(seen, entry.hops) => continue,
            Some(_) => {}
            None => {
                reached.push(Reached {
                    vertex: entry.vertex,
                    distance: entry.distance,
                    hops: entry.hops,
                });
                if bound.limit.is_some_and(|limit| reached.len() >= limit) {
                    break;
                }
            }
        }
        expanded.insert(entry.vertex, entry.hops);

        if bound.max_hops.is_some_and(|max| entry.hops >= max) {
            continue;
        }

        let hops = entry.hops + 1;
        for edge in snapshot.neighbors(entry.vertex) {
            let distance = entry.distance.saturating_add(u64::from(edge.weight));
            if bound.max_weight.is_some_and(|max| distance > max) {
                continue;
            }
            if let Some(&seen) = expanded.get(&edge.target) {
                if dominated_by(seen, hops) {
                    continue;
                }
            }
            match tentative.get(&edge.target).copied() {
                Some((d, h)) if d <= distance && dominated_by(h, hops) => continue,
                Some((d, _)) if d <= distance => {}
                _ => {
                    tentative.insert(edge.target, (distance, hops));
                }
            }
            heap.push(FrontierEntry {
                distance,
                vertex: edge.target,
                hops,
            });
        }
    }

    log::debug!(
        "fan-out from {} reached {} vertices in {} pops",
        source,
        reached.len(),
        gate.pops
    );
    Ok(reached)
}
