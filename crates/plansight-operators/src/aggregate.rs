//! Scalar and grouped aggregation: mean, sum, count, min, max, std.
//!
//! Groups are formed by exact equality of the `group_by` values and reported
//! in first-occurrence order. Rows with a null in any key column belong to no
//! group. Null target values are skipped by every function except `count`,
//! which counts rows.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use plansight_core::ops::Operation;
use plansight_core::schema::DataType;
use plansight_core::types::{Column, Frame, Scalar};

use crate::numeric::numeric_column;
use crate::payload::{GroupEntry, GroupKey, GroupedMeasures, Measure, ResultPayload};
use crate::traits::{OpError, Operator};

/// Aggregation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Mean,
    Sum,
    Count,
    Min,
    Max,
    Std,
}

impl AggFunc {
    pub fn from_operation(op: Operation) -> Option<Self> {
        match op {
            Operation::Mean => Some(AggFunc::Mean),
            Operation::Sum => Some(AggFunc::Sum),
            Operation::Count => Some(AggFunc::Count),
            Operation::Min => Some(AggFunc::Min),
            Operation::Max => Some(AggFunc::Max),
            Operation::Std => Some(AggFunc::Std),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggFunc::Mean => "mean",
            AggFunc::Sum => "sum",
            AggFunc::Count => "count",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Std => "std",
        }
    }
}

/// Aggregate value accumulator (Welford for the variance).
#[derive(Debug, Clone)]
pub struct AggValue {
    /// Rows seen, including null targets.
    pub rows: u64,
    /// Numeric observations.
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    mean: f64,
    m2: f64,
}

impl Default for AggValue {
    fn default() -> Self {
        Self {
            rows: 0,
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            mean: 0.0,
            m2: 0.0,
        }
    }
}

impl AggValue {
    pub fn update(&mut self, val: f64) {
        self.count += 1;
        self.sum += val;
        if val < self.min {
            self.min = val;
        }
        if val > self.max {
            self.max = val;
        }
        let delta = val - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (val - self.mean);
    }

    /// Record one row; `val` is `None` for a null or non-numeric cell.
    fn observe(&mut self, val: Option<f64>) {
        self.rows += 1;
        if let Some(v) = val.filter(|v| !v.is_nan()) {
            self.update(v);
        }
    }

    pub fn finish(&self, func: AggFunc) -> Measure {
        let undefined = self.count == 0;
        match func {
            AggFunc::Count => Measure::Count(self.rows),
            AggFunc::Sum => Measure::Value(self.sum),
            AggFunc::Mean if undefined => Measure::Value(f64::NAN),
            AggFunc::Mean => Measure::Value(self.sum / self.count as f64),
            AggFunc::Min if undefined => Measure::Value(f64::NAN),
            AggFunc::Min => Measure::Value(self.min),
            AggFunc::Max if undefined => Measure::Value(f64::NAN),
            AggFunc::Max => Measure::Value(self.max),
            AggFunc::Std if self.count < 2 => Measure::Value(f64::NAN),
            AggFunc::Std => Measure::Value((self.m2 / (self.count - 1) as f64).sqrt()),
        }
    }
}

/// Hashable form of one group-key value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Bool(bool),
    Number(u64),
    Text(String),
    Temporal(NaiveDateTime),
}

impl KeyPart {
    fn of(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Null => None,
            Scalar::Number(v) if v.is_nan() => None,
            // -0.0 and 0.0 are the same group
            Scalar::Number(v) => Some(KeyPart::Number((v + 0.0).to_bits())),
            Scalar::Bool(b) => Some(KeyPart::Bool(*b)),
            Scalar::Text(s) => Some(KeyPart::Text(s.clone())),
            Scalar::Temporal(t) => Some(KeyPart::Temporal(*t)),
        }
    }
}

pub struct Aggregate {
    pub func: AggFunc,
    /// `None` picks the dataset's only numeric column (ignored by `count`).
    pub target: Option<String>,
    pub group_by: Vec<String>,
}

impl Aggregate {
    pub fn new(func: AggFunc) -> Self {
        Self {
            func,
            target: None,
            group_by: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_group_by(mut self, group_by: Vec<String>) -> Self {
        self.group_by = group_by;
        self
    }

    fn target_column<'a>(&self, input: &'a Frame) -> Result<Option<&'a Column>, OpError> {
        if self.func == AggFunc::Count {
            return Ok(None);
        }
        match &self.target {
            Some(name) => numeric_column(input, name).map(Some),
            None => self.default_target(input).map(Some),
        }
    }

    fn default_target<'a>(&self, input: &'a Frame) -> Result<&'a Column, OpError> {
        let candidates: Vec<&Column> = input
            .columns()
            .iter()
            .filter(|c| c.data_type == DataType::Numeric && !self.group_by.contains(&c.name))
            .collect();
        match candidates.as_slice() {
            [only] => Ok(only),
            [] => Err(OpError::MissingParameter(format!(
                "'{}' needs target_column and the dataset has no numeric column",
                self.func.as_str()
            ))),
            many => Err(OpError::MissingParameter(format!(
                "'{}' needs target_column; candidates are {}",
                self.func.as_str(),
                many.iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    fn grouped(&self, input: &Frame, target: Option<&Column>) -> Result<GroupedMeasures, OpError> {
        let keys = self
            .group_by
            .iter()
            .map(|name| {
                input
                    .column(name)
                    .ok_or_else(|| OpError::column_not_found(name, input))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut index: HashMap<Vec<KeyPart>, usize> = HashMap::new();
        let mut groups: Vec<(GroupKey, AggValue)> = Vec::new();

        'rows: for row in 0..input.num_rows() {
            let mut parts = Vec::with_capacity(keys.len());
            for key in &keys {
                match KeyPart::of(&key.values[row]) {
                    Some(p) => parts.push(p),
                    None => continue 'rows,
                }
            }
            let slot = *index.entry(parts).or_insert_with(|| {
                let key = GroupKey(keys.iter().map(|k| k.values[row].clone()).collect());
                groups.push((key, AggValue::default()));
                groups.len() - 1
            });
            groups[slot]
                .1
                .observe(target.and_then(|t| t.values[row].as_f64()));
        }

        Ok(GroupedMeasures {
            columns: self.group_by.clone(),
            groups: groups
                .into_iter()
                .map(|(key, acc)| GroupEntry {
                    key,
                    value: acc.finish(self.func),
                })
                .collect(),
        })
    }
}

impl Operator for Aggregate {
    fn name(&self) -> &'static str {
        self.func.as_str()
    }

    fn eval(&self, input: &Frame) -> Result<ResultPayload, OpError> {
        let target = self.target_column(input)?;

        if !self.group_by.is_empty() {
            let grouped = self.grouped(input, target)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(func = self.func.as_str(), groups = grouped.len(), "grouped aggregate");
            return Ok(ResultPayload::Grouped(grouped));
        }

        let mut acc = AggValue::default();
        for row in 0..input.num_rows() {
            acc.observe(target.and_then(|t| t.values[row].as_f64()));
        }
        Ok(ResultPayload::Scalar(acc.finish(self.func)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(vec![
            Column::new(
                "region",
                DataType::Text,
                vec![
                    Scalar::Text("N".into()),
                    Scalar::Text("S".into()),
                    Scalar::Text("N".into()),
                    Scalar::Null,
                ],
            ),
            Column::new(
                "sales",
                DataType::Numeric,
                vec![
                    Scalar::Number(10.0),
                    Scalar::Number(20.0),
                    Scalar::Null,
                    Scalar::Number(5.0),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn welford_matches_two_pass() {
        let mut acc = AggValue::default();
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            acc.update(v);
        }
        let std = acc.finish(AggFunc::Std).as_f64();
        assert!((std - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn count_counts_rows_not_values() {
        let out = Aggregate::new(AggFunc::Count).eval(&frame()).unwrap();
        assert_eq!(out.as_scalar(), Some(Measure::Count(4)));
    }

    #[test]
    fn null_keys_form_no_group() {
        let out = Aggregate::new(AggFunc::Sum)
            .with_target("sales")
            .with_group_by(vec!["region".into()])
            .eval(&frame())
            .unwrap();
        let grouped = out.as_grouped().unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get("N"), Some(Measure::Value(10.0)));
        assert_eq!(grouped.get("S"), Some(Measure::Value(20.0)));
    }

    #[test]
    fn default_target_is_sole_numeric_column() {
        let out = Aggregate::new(AggFunc::Max).eval(&frame()).unwrap();
        assert_eq!(out.as_scalar(), Some(Measure::Value(20.0)));
    }

    #[test]
    fn text_target_is_a_type_mismatch() {
        let err = Aggregate::new(AggFunc::Mean)
            .with_target("region")
            .eval(&frame())
            .unwrap_err();
        assert!(matches!(err, OpError::TypeMismatch { .. }));
    }
}
