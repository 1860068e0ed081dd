//! Chart rendering capability.
//!
//! Renderers are collaborators of the engine, not part of the result
//! contract: `BestEffort` turns every renderer failure (including a panic)
//! into "no chart", so a chart can never fail an execution.

pub mod svg;

use std::panic::{catch_unwind, AssertUnwindSafe};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use plansight_core::types::Frame;
use plansight_planner::ExecutionPlan;

pub use svg::SvgRenderer;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart needs {0}")]
    MissingInput(&'static str),

    #[error("chart column '{0}' not found")]
    ColumnNotFound(String),

    #[error("chart column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("nothing to plot")]
    NoData,

    #[error("chart drawing failed: {0}")]
    Draw(String),
}

/// An encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Chart {
    pub fn svg(document: String) -> Self {
        Self {
            mime: "image/svg+xml",
            bytes: document.into_bytes(),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

pub trait ChartRenderer: Send + Sync {
    /// `Ok(None)` means the plan asks for no chart this renderer draws.
    fn render(&self, frame: &Frame, plan: &ExecutionPlan) -> Result<Option<Chart>, ChartError>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for Box<R> {
    fn render(&self, frame: &Frame, plan: &ExecutionPlan) -> Result<Option<Chart>, ChartError> {
        (**self).render(frame, plan)
    }
}

/// Absorbs renderer failures into "no chart".
pub struct BestEffort<R> {
    inner: R,
}

impl<R: ChartRenderer> BestEffort<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn render(&self, frame: &Frame, plan: &ExecutionPlan) -> Option<Chart> {
        match catch_unwind(AssertUnwindSafe(|| self.inner.render(frame, plan))) {
            Ok(Ok(chart)) => chart,
            Ok(Err(err)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "chart rendering failed, continuing without chart");
                let _ = err;
                None
            }
            Err(panic) => {
                let msg = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                #[cfg(feature = "tracing")]
                tracing::warn!(panic = %msg, "chart renderer panicked, continuing without chart");
                let _ = msg;
                None
            }
        }
    }
}
