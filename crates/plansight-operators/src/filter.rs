//! Filter engine.
//!
//! Predicates are `column OP literal` with OP ∈ {==, !=, <, <=, >, >=}.
//! They apply in list order, each narrowing the previous result, which is a
//! logical AND across the list. Row order is preserved.
//!
//! An empty result is *not* an error here: "matched nothing" is decided by
//! the caller, which distinguishes it from a malformed predicate.

use serde_json::Value;

use plansight_core::compare::{coerce_literal, CmpOp};
use plansight_core::types::{Column, Frame, Scalar};

use crate::traits::OpError;

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: CmpOp,
    /// Untyped literal; coerced against the column when applied.
    pub literal: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CmpOp, literal: Value) -> Self {
        Self {
            column: column.into(),
            op,
            literal,
        }
    }

    fn resolve(&self, col: &Column) -> Result<Scalar, OpError> {
        let mismatch = |detail: String| OpError::TypeMismatch {
            column: self.column.clone(),
            expected: col.data_type,
            detail,
        };

        let raw = Scalar::from_json(&self.literal)
            .ok_or_else(|| mismatch(format!("cannot compare with non-scalar value {}", self.literal)))?;
        let literal = coerce_literal(&raw, col.data_type).ok_or_else(|| {
            mismatch(format!(
                "cannot compare {} column '{}' with value {}",
                col.data_type, self.column, self.literal
            ))
        })?;
        if literal.is_null() && self.op.is_ordering() {
            return Err(mismatch(format!(
                "operator '{}' cannot compare with null",
                self.op
            )));
        }
        Ok(literal)
    }
}

/// Apply `predicates` to `input`, returning the narrowed frame.
///
/// Every referenced column is checked before any row is examined, so an
/// unknown column is reported no matter where it sits in the list.
pub fn apply_filters(input: &Frame, predicates: &[Predicate]) -> Result<Frame, OpError> {
    if predicates.is_empty() {
        return Ok(input.clone());
    }

    let mut resolved = Vec::with_capacity(predicates.len());
    for p in predicates {
        let col = input
            .column(&p.column)
            .ok_or_else(|| OpError::column_not_found(&p.column, input))?;
        resolved.push((col, p.op));
    }

    let mut literals = Vec::with_capacity(predicates.len());
    for (p, (col, _)) in predicates.iter().zip(&resolved) {
        literals.push(p.resolve(col)?);
    }

    let mut keep: Vec<usize> = (0..input.num_rows()).collect();
    for ((col, op), literal) in resolved.iter().zip(&literals) {
        keep.retain(|&i| op.matches(&col.values[i], literal));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        predicates = predicates.len(),
        input_rows = input.num_rows(),
        output_rows = keep.len(),
        "applied filters"
    );

    Ok(input.take(&keep))
}

