//! All data types for the follow-graph library.

pub mod distance;
pub mod edge;
pub mod error;

pub use distance::Distance;
pub use edge::{Relationship, RelationshipStatus};
pub use error::{GraphError, GraphResult};

/// Unique student identifier. Every vertex is keyed by one.
pub type StudentId = u64;

/// Positive edge weight. Lower weight means a shorter path.
pub type Weight = u32;

/// Number of frontier pops between two cancellation checks.
pub const CANCEL_CHECK_INTERVAL: u32 = 64;

/// Default hop bound for fan-out and recommendation queries.
pub const DEFAULT_FANOUT_MAX_HOPS: u32 = 3;

/// Default number of recommendations returned.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}
