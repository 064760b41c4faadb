//! Shortest connections between students.
//!
//! Accepted follow relationships form a directed, weighted graph. A snapshot
//! of that graph is built once from the persistence layer's records and then
//! queried for weighted distance, path, degrees of separation, and bounded
//! fan-out.

pub mod cli;
pub mod engine;
pub mod graph;
pub mod types;

// Re-export commonly used types at the crate root
pub use engine::{
    CancelToken, ConnectionResult, FanoutBound, FanoutParams, FanoutResult, PathResult,
    QueryEngine, Reached, RecommendParams,
};
pub use graph::{build_snapshot, BuildReport, Edge, GraphBuilder, GraphSnapshot, SnapshotHandle};
pub use types::{
    now_micros, Distance, GraphError, GraphResult, Relationship, RelationshipStatus, StudentId,
    Weight, CANCEL_CHECK_INTERVAL, DEFAULT_FANOUT_MAX_HOPS, DEFAULT_RECOMMENDATION_LIMIT,
};
