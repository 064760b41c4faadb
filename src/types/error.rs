//! Error types for the follow-graph library.

use thiserror::Error;

use super::{StudentId, Weight};

/// All errors that can occur in the follow-graph library.
///
/// An unreachable target is not an error; see [`super::Distance::Unreachable`].
#[derive(Error, Debug)]
pub enum GraphError {
    /// Query references a student absent from the snapshot.
    #[error("Student {0} not found in graph snapshot")]
    VertexNotFound(StudentId),

    /// Query aborted through its cancel token.
    #[error("Query cancelled")]
    Cancelled,

    /// Query aborted because its deadline elapsed.
    #[error("Query deadline exceeded")]
    DeadlineExceeded,

    /// Relationship carries a non-positive weight.
    #[error("Relationship {source_id} -> {target_id} has invalid weight {weight}")]
    InvalidWeight {
        source_id: StudentId,
        target_id: StudentId,
        weight: Weight,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    /// True for the two query-abort variants.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Convenience result type for follow-graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
