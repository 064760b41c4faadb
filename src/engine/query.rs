//! Query executor for distance, path and fan-out queries over a snapshot.

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::GraphSnapshot;
use crate::types::{
    Distance, GraphError, GraphResult, StudentId, DEFAULT_FANOUT_MAX_HOPS,
    DEFAULT_RECOMMENDATION_LIMIT,
};

use super::cancel::CancelToken;
use super::dijkstra::{bounded_fanout, single_target, FanoutBound, Reached};

/// Parameters for a bounded fan-out query.
#[derive(Debug, Clone, Copy)]
pub struct FanoutParams {
    /// Starting student.
    pub source: StudentId,
    /// Maximum cumulative weight (inclusive).
    pub max_weight: Option<u64>,
    /// Maximum number of hops (inclusive).
    pub max_hops: Option<u32>,
    /// Maximum number of vertices to return, source excluded.
    pub max_results: Option<usize>,
}

impl FanoutParams {
    /// Unbounded fan-out from `source`.
    pub fn new(source: StudentId) -> Self {
        Self {
            source,
            max_weight: None,
            max_hops: None,
            max_results: None,
        }
    }
}

/// Result of a fan-out query.
#[derive(Debug, Clone, Serialize)]
pub struct FanoutResult {
    pub source: StudentId,
    /// Reached vertices other than the source, ascending by (distance, id).
    pub reached: Vec<Reached>,
}

/// Parameters for a recommendation query.
#[derive(Debug, Clone, Copy)]
pub struct RecommendParams {
    pub source: StudentId,
    /// Hop bound for exploration.
    pub max_hops: u32,
    /// Optional weight bound for exploration.
    pub max_weight: Option<u64>,
    /// Maximum number of recommendations.
    pub limit: usize,
}

impl RecommendParams {
    /// Defaults: `DEFAULT_FANOUT_MAX_HOPS` hops, no weight bound,
    /// `DEFAULT_RECOMMENDATION_LIMIT` results.
    pub fn new(source: StudentId) -> Self {
        Self {
            source,
            max_hops: DEFAULT_FANOUT_MAX_HOPS,
            max_weight: None,
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

/// Distance and path between two students, as handed to the serving layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionResult {
    pub source: StudentId,
    pub target: StudentId,
    pub distance: Distance,
    /// Source to target inclusive; empty when unreachable.
    pub path: Vec<StudentId>,
    /// Hop count of `path`; `None` when unreachable.
    pub degrees: Option<u32>,
}

/// The query engine supports all connection queries.
///
/// Stateless: every method reads only the snapshot it is given, so one
/// engine may serve any number of threads and snapshots.
pub struct QueryEngine;

impl QueryEngine {
    /// Create a new query engine.
    pub fn new() -> Self {
        Self
    }

    /// Minimal total weight from `source` to `target`.
    ///
    /// With `max_weight`, a shortest path heavier than the cutoff reports
    /// `Distance::Unreachable`.
    pub fn shortest_distance(
        &self,
        snapshot: &GraphSnapshot,
        source: StudentId,
        target: StudentId,
        max_weight: Option<u64>,
    ) -> GraphResult<Distance> {
        let found = single_target(snapshot, source, target, max_weight, &CancelToken::never())?;
        Ok(found.map(|p| p.distance).into())
    }

    /// Vertex ids from `source` to `target` inclusive, or empty if unreachable.
    pub fn shortest_path(
        &self,
        snapshot: &GraphSnapshot,
        source: StudentId,
        target: StudentId,
    ) -> GraphResult<Vec<StudentId>> {
        let found = single_target(snapshot, source, target, None, &CancelToken::never())?;
        Ok(found.map(|p| p.path).unwrap_or_default())
    }

    /// Hop count of the shortest (minimum-weight) path.
    ///
    /// This is the number of edges on the returned path, not its weight,
    /// and not necessarily the fewest hops between the two students.
    pub fn degrees_of_separation(
        &self,
        snapshot: &GraphSnapshot,
        source: StudentId,
        target: StudentId,
    ) -> GraphResult<Option<u32>> {
        let found = single_target(snapshot, source, target, None, &CancelToken::never())?;
        Ok(found.map(|p| p.hops()))
    }

    /// Distance, path and degrees in one search.
    pub fn connection(
        &self,
        snapshot: &GraphSnapshot,
        source: StudentId,
        target: StudentId,
        token: &CancelToken,
    ) -> GraphResult<ConnectionResult> {
        let found = single_target(snapshot, source, target, None, token)?;
        Ok(match found {
            Some(p) => ConnectionResult {
                source,
                target,
                distance: Distance::Reachable(p.distance),
                degrees: Some(p.hops()),
                path: p.path,
            },
            None => ConnectionResult {
                source,
                target,
                distance: Distance::Unreachable,
                path: Vec::new(),
                degrees: None,
            },
        })
    }

    /// Every vertex reachable from the source within the bounds.
    pub fn fan_out(
        &self,
        snapshot: &GraphSnapshot,
        params: FanoutParams,
        token: &CancelToken,
    ) -> GraphResult<FanoutResult> {
        let bound = FanoutBound {
            max_weight: params.max_weight,
            max_hops: params.max_hops,
            // The engine counts the source as well.
            limit: params.max_results.map(|n| n.saturating_add(1)),
        };
        let reached = bounded_fanout(snapshot, params.source, bound, token)?
            .into_iter()
            .filter(|r| r.vertex != params.source)
            .collect();

        Ok(FanoutResult {
            source: params.source,
            reached,
        })
    }

    /// Nearby students the source does not follow yet, closest first.
    pub fn recommend(
        &self,
        snapshot: &GraphSnapshot,
        params: RecommendParams,
        token: &CancelToken,
    ) -> GraphResult<Vec<Reached>> {
        let direct: HashSet<StudentId> = snapshot
            .neighbors(params.source)
            .iter()
            .map(|e| e.target)
            .collect();

        let bound = FanoutBound {
            max_weight: params.max_weight,
            max_hops: Some(params.max_hops),
            limit: None,
        };
        let mut candidates: Vec<Reached> = bounded_fanout(snapshot, params.source, bound, token)?
            .into_iter()
            .filter(|r| r.vertex != params.source && !direct.contains(&r.vertex))
            .collect();

        candidates.truncate(params.limit);
        Ok(candidates)
    }

    /// All students the source does not directly follow, ascending by id.
    pub fn non_connections(
        &self,
        snapshot: &GraphSnapshot,
        source: StudentId,
    ) -> GraphResult<Vec<StudentId>> {
        if !snapshot.contains(source) {
            return Err(GraphError::VertexNotFound(source));
        }
        let direct: HashSet<StudentId> = snapshot
            .neighbors(source)
            .iter()
            .map(|e| e.target)
            .collect();

        Ok(snapshot
            .vertices()
            .iter()
            .copied()
            .filter(|&id| id != source && !direct.contains(&id))
            .collect())
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
