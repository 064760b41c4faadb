//! Relationship status and the inbound relationship record.

use serde::{Deserialize, Serialize};

use super::{GraphError, GraphResult, StudentId, Weight};

/// Lifecycle state of a follow relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum RelationshipStatus {
    /// Follow request sent, not yet answered.
    Pending = 0,
    /// Follow request accepted. The only status that forms a graph edge.
    Accepted = 1,
    /// Follow request declined.
    Rejected = 2,
    /// Followee blocked the follower.
    Blocked = 3,
}

impl RelationshipStatus {
    /// Convert a u8 value to a status, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Accepted),
            2 => Some(Self::Rejected),
            3 => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Return the canonical upper-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Blocked => "BLOCKED",
        }
    }

    /// Parse a status from its name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "ACCEPTED" => Some(Self::Accepted),
            "REJECTED" => Some(Self::Rejected),
            "BLOCKED" => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Whether relationships in this state are traversable.
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A directed follow relationship as supplied by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// The student doing the following (edge source).
    pub follower_id: StudentId,
    /// The student being followed (edge target).
    pub followee_id: StudentId,
    /// Current lifecycle state.
    pub status: RelationshipStatus,
    /// Traversal cost. Must be positive.
    pub weight: Weight,
}

impl Relationship {
    /// Create a relationship record with an explicit status.
    pub fn new(
        follower_id: StudentId,
        followee_id: StudentId,
        status: RelationshipStatus,
        weight: Weight,
    ) -> Self {
        Self {
            follower_id,
            followee_id,
            status,
            weight,
        }
    }

    /// Create an accepted relationship.
    pub fn accepted(follower_id: StudentId, followee_id: StudentId, weight: Weight) -> Self {
        Self::new(follower_id, followee_id, RelationshipStatus::Accepted, weight)
    }

    /// True when follower and followee are the same student.
    pub fn is_self_loop(&self) -> bool {
        self.follower_id == self.followee_id
    }

    /// Strict validation for callers that want a hard failure on bad weights.
    pub fn validate(&self) -> GraphResult<()> {
        if self.weight == 0 {
            return Err(GraphError::InvalidWeight {
                source_id: self.follower_id,
                target_id: self.followee_id,
                weight: self.weight,
            });
        }
        Ok(())
    }
}

impl From<(StudentId, StudentId, Weight)> for Relationship {
    fn from((follower_id, followee_id, weight): (StudentId, StudentId, Weight)) -> Self {
        Self::accepted(follower_id, followee_id, weight)
    }
}
