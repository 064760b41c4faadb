//! Shortest-path engine, cancellation, and the query layer on top.

pub mod cancel;
pub mod dijkstra;
pub mod query;

pub use cancel::CancelToken;
pub use dijkstra::{bounded_fanout, single_target, FanoutBound, PathResult, Reached};
pub use query::{ConnectionResult, FanoutParams, FanoutResult, QueryEngine, RecommendParams};
