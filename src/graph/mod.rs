//! In-memory graph model: snapshots, the builder, and the shared handle.

pub mod builder;
pub mod shared;
pub mod snapshot;

pub use builder::{build_snapshot, BuildReport, GraphBuilder};
pub use shared::SnapshotHandle;
pub use snapshot::{Edge, GraphSnapshot};
