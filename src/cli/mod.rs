//! Command-line driver over a JSON dataset.

pub mod commands;

pub use commands::{load_dataset, load_snapshot, Dataset};
