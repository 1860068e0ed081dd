#![forbid(unsafe_code)]
//! plansight-planner: the declarative analytics plan.
//!
//! - `plan`: typed `ExecutionPlan` and the `Verdict` returned by validation.
//! - `validate`: total, side-effect-free validation of untyped plan values.
//! - `dsl`: plan documents in JSON or YAML.

pub mod dsl;
pub mod error;
pub mod plan;
pub mod validate;

pub use dsl::{parse_plan_document, PlanFormat};
pub use error::PlanError;
pub use plan::{ChartType, ExecutionPlan, FilterSpec, Verdict};
pub use validate::validate;
