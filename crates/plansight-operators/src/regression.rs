//! Ordinary least squares with a single predictor.

use plansight_core::types::Frame;

use crate::numeric::{mean, moments, numeric_column, paired};
use crate::payload::{RegressionResult, ResultPayload};
use crate::traits::{OpError, Operator};

pub struct Regression {
    pub x: String,
    pub y: String,
}

impl Regression {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// `None` unless `xs` holds at least two distinct values.
pub fn least_squares(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let (sxx, _, sxy) = moments(xs, ys);
    if xs.len() < 2 || sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = mean(ys) - slope * mean(xs);

    let my = mean(ys);
    let ss_tot: f64 = ys.iter().map(|y| (y - my).powi(2)).sum();
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();

    let r_squared = if ss_tot > f64::EPSILON {
        1.0 - ss_res / ss_tot
    } else if ss_res <= f64::EPSILON {
        1.0
    } else {
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

impl Operator for Regression {
    fn name(&self) -> &'static str {
        "regression"
    }

    fn eval(&self, input: &Frame) -> Result<ResultPayload, OpError> {
        let x = numeric_column(input, &self.x)?;
        let y = numeric_column(input, &self.y)?;
        let (xs, ys) = paired(x, y);

        let fit = least_squares(&xs, &ys).ok_or_else(|| {
            OpError::InsufficientData(format!(
                "regression needs at least 2 distinct values of '{}' ({} paired rows)",
                self.x,
                xs.len()
            ))
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(pairs = xs.len(), slope = fit.slope, r_squared = fit.r_squared, "regression");

        Ok(ResultPayload::Regression(RegressionResult {
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            x_column: self.x.clone(),
            y_column: self.y.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line() {
        let fit = least_squares(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!(fit.intercept.abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_response_is_a_perfect_fit() {
        let fit = least_squares(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn one_distinct_x_is_rejected() {
        assert!(least_squares(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(least_squares(&[1.0], &[1.0]).is_none());
    }
}
