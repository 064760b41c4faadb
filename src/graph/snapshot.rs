//! Immutable graph snapshot: vertices plus accepted edges with an adjacency index.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{now_micros, StudentId, Weight};

/// A directed accepted follow edge inside a snapshot.
///
/// Status is not stored: every edge in a snapshot is traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    /// Follower.
    pub source: StudentId,
    /// Followee.
    pub target: StudentId,
    /// Traversal cost, always > 0.
    pub weight: Weight,
}

impl Edge {
    pub fn new(source: StudentId, target: StudentId, weight: Weight) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

/// Read-only view of the follow graph at one point in time.
///
/// There is no mutation API. A change in the relationship set is reflected
/// by building a new snapshot with [`super::GraphBuilder`].
#[derive(Debug)]
pub struct GraphSnapshot {
    /// All vertex ids, sorted ascending, unique.
    vertices: Vec<StudentId>,
    /// All edges, sorted by (source, target).
    edges: Vec<Edge>,
    /// Adjacency index: source -> (start_index, count) in edges vec.
    adjacency: HashMap<StudentId, (usize, usize)>,
    /// When this snapshot was materialized (Unix epoch microseconds).
    built_at: u64,
}

impl GraphSnapshot {
    /// Assemble a snapshot from already-validated parts.
    ///
    /// Callers guarantee that every edge endpoint is in `vertices`, that
    /// weights are positive, and that there are no self-loops or parallel edges.
    pub(crate) fn from_parts(mut vertices: Vec<StudentId>, mut edges: Vec<Edge>) -> Self {
        vertices.sort_unstable();
        vertices.dedup();

        edges.sort_by(|a, b| a.source.cmp(&b.source).then(a.target.cmp(&b.target)));

        let mut adjacency = HashMap::with_capacity(vertices.len());
        let mut i = 0;
        while i < edges.len() {
            let source = edges[i].source;
            let start = i;
            while i < edges.len() && edges[i].source == source {
                i += 1;
            }
            adjacency.insert(source, (start, i - start));
        }

        Self {
            vertices,
            edges,
            adjacency,
            built_at: now_micros(),
        }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), Vec::new())
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of accepted edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the snapshot has a vertex with this id.
    pub fn contains(&self, id: StudentId) -> bool {
        self.vertices.binary_search(&id).is_ok()
    }

    /// Outgoing edges of a vertex, ordered by target id.
    ///
    /// Empty for unknown vertices and for vertices that follow nobody.
    pub fn neighbors(&self, id: StudentId) -> &[Edge] {
        if let Some(&(start, count)) = self.adjacency.get(&id) {
            &self.edges[start..start + count]
        } else {
            &[]
        }
    }

    /// Number of outgoing edges.
    pub fn out_degree(&self, id: StudentId) -> usize {
        self.neighbors(id).len()
    }

    /// Weight of the direct edge `source -> target`, if any.
    pub fn edge_weight(&self, source: StudentId, target: StudentId) -> Option<Weight> {
        let out = self.neighbors(source);
        out.binary_search_by(|e| e.target.cmp(&target))
            .ok()
            .map(|i| out[i].weight)
    }

    /// All vertex ids, ascending.
    pub fn vertices(&self) -> &[StudentId] {
        &self.vertices
    }

    /// All edges, sorted by (source, target).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Build time as Unix epoch microseconds.
    pub fn built_at(&self) -> u64 {
        self.built_at
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
