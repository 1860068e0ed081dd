#![forbid(unsafe_code)]
//! plansight-core: shared kernel for the plansight analytics engine.
//!
//! This crate contains only *pure* types, small helpers, and configuration.
//! There is **no I/O** and **no logging** here.
//!
//! Crates that use this:
//! - plansight-io: builds `Frame`s from delimited sources.
//! - plansight-planner: validates plans and references `Operation`/`CmpOp`.
//! - plansight-operators: filters and reduces `Frame`s.
//! - plansight-exec: orchestrates everything and emits `ExecutionResult`s.

pub mod compare;
pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod ops;
pub mod prelude;
pub mod schema;
pub mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
