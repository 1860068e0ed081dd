//! Pearson correlation between two numeric columns.

use plansight_core::types::Frame;

use crate::numeric::{moments, numeric_column, paired};
use crate::payload::{CorrelationResult, ResultPayload};
use crate::traits::{OpError, Operator};

pub struct Correlation {
    pub x: String,
    pub y: String,
}

impl Correlation {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Pearson r over paired observations; NaN when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let (sxx, syy, sxy) = moments(xs, ys);
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

impl Operator for Correlation {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn eval(&self, input: &Frame) -> Result<ResultPayload, OpError> {
        let x = numeric_column(input, &self.x)?;
        let y = numeric_column(input, &self.y)?;
        let (xs, ys) = paired(x, y);
        let coefficient = pearson(&xs, &ys);

        #[cfg(feature = "tracing")]
        tracing::debug!(pairs = xs.len(), coefficient, "correlation");

        Ok(ResultPayload::Correlation(CorrelationResult {
            coefficient,
            x_column: self.x.clone(),
            y_column: self.y.clone(),
        }))
    }
}
