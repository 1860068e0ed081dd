#![forbid(unsafe_code)]
//! plansight-operators: filtering and the analytics operations.
//!
//! Every operator reads the complete filtered `Frame` and returns one
//! `ResultPayload`. Nothing here samples, caches, or keeps state between calls.

pub mod aggregate;
pub mod correlation;
pub mod filter;
pub mod forecast;
pub mod numeric;
pub mod payload;
pub mod registry;
pub mod regression;
pub mod traits;

pub use filter::{apply_filters, Predicate};
pub use payload::ResultPayload;
pub use registry::{OpParams, Registry};
pub use traits::{OpError, Operator};
