//! The distance value returned by queries.

use serde::{Serialize, Serializer};

/// Total weight of a shortest path, or the explicit absence of one.
///
/// Ordering places every reachable distance before `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Distance {
    /// Minimum summed weight from source to target.
    Reachable(u64),
    /// No accepted path exists (or none within the requested cutoff).
    Unreachable,
}

impl Distance {
    /// The numeric distance, if reachable.
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Reachable(d) => Some(*d),
            Self::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }
}

impl From<Option<u64>> for Distance {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unreachable, Self::Reachable)
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reachable(d) => write!(f, "{}", d),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Reachable(d) => serializer.serialize_u64(*d),
            Self::Unreachable => serializer.serialize_str("unreachable"),
        }
    }
}
