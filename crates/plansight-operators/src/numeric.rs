//! Numeric column access shared by the operators.

use plansight_core::schema::DataType;
use plansight_core::types::{Column, Frame};

use crate::traits::OpError;

/// Look up `name` and require it to be numeric.
pub fn numeric_column<'a>(frame: &'a Frame, name: &str) -> Result<&'a Column, OpError> {
    let col = frame
        .column(name)
        .ok_or_else(|| OpError::column_not_found(name, frame))?;
    if col.data_type != DataType::Numeric {
        return Err(OpError::TypeMismatch {
            column: name.to_string(),
            expected: DataType::Numeric,
            detail: format!("column '{}' is {}, expected numeric", name, col.data_type),
        });
    }
    Ok(col)
}

/// Non-null, non-NaN values in row order.
pub fn observed(col: &Column) -> Vec<f64> {
    col.values
        .iter()
        .filter_map(|v| v.as_f64())
        .filter(|v| !v.is_nan())
        .collect()
}

/// Rows where both columns hold a number.
pub fn paired(x: &Column, y: &Column) -> (Vec<f64>, Vec<f64>) {
    x.values
        .iter()
        .zip(&y.values)
        .filter_map(|(a, b)| match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((a, b)),
            _ => None,
        })
        .unzip()
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Centered sums of squares and cross products: (Sxx, Syy, Sxy).
pub fn moments(xs: &[f64], ys: &[f64]) -> (f64, f64, f64) {
    let mx = mean(xs);
    let my = mean(ys);
    xs.iter()
        .zip(ys)
        .fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (x, y)| {
            let dx = x - mx;
            let dy = y - my;
            (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
        })
}
