#![forbid(unsafe_code)]
//! plansight-io: dataset loading.
//!
//! - `readers`: delimited (CSV) reader with per-column type inference → `Frame`.
//! - `summary`: the `DatasetSummary` returned to callers after a load.
//! - `loader`: path/bytes entry points enforcing the format and size guards.

pub mod error;
pub mod loader;
pub mod readers;
pub mod summary;

pub use loader::{load_bytes, load_path, load_reader, LoadedDataset};
pub use summary::DatasetSummary;
