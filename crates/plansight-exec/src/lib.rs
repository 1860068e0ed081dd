#![forbid(unsafe_code)]
//! plansight-exec: plan execution.
//!
//! - `runtime`: the `Engine` that validates, filters, dispatches and charts.
//! - `result`: the `ExecutionResult` returned for every call.
//! - `chart`: renderer capability, best-effort adapter, SVG renderer.
//! - `session`: session id → engine mapping for concurrent datasets.

pub mod chart;
pub mod result;
pub mod runtime;
pub mod session;

pub use chart::{BestEffort, Chart, ChartError, ChartRenderer, SvgRenderer};
pub use result::ExecutionResult;
pub use runtime::{Completed, Engine, ExecError};
pub use session::{SessionError, SessionRegistry};
