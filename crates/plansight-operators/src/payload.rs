//! Operation-specific result payloads.
//!
//! Payloads serialize to plain JSON: a scalar aggregation is a bare number,
//! a grouped aggregation is an object keyed by group label, and the
//! statistical operations are objects with named fields. Undefined values
//! (NaN) serialize as `null`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use plansight_core::types::Scalar;

/// A single aggregate value. `count` reports an integer cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measure {
    Count(u64),
    Value(f64),
}

impl Measure {
    pub fn as_f64(&self) -> f64 {
        match self {
            Measure::Count(n) => *n as f64,
            Measure::Value(v) => *v,
        }
    }
}

/// Distinct values of the `group_by` columns for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupKey(pub Vec<Scalar>);

impl GroupKey {
    /// `N` for one key column. Several columns render as a compact JSON
    /// array, `["N",2024]`, so values containing commas stay distinct.
    pub fn label(&self) -> String {
        match self.0.as_slice() {
            [single] => single.to_string(),
            parts => Value::Array(parts.iter().map(Scalar::to_json).collect()).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    pub key: GroupKey,
    pub value: Measure,
}

/// Per-group aggregates in first-occurrence order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMeasures {
    pub columns: Vec<String>,
    pub groups: Vec<GroupEntry>,
}

impl GroupedMeasures {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<Measure> {
        self.groups
            .iter()
            .find(|g| g.key.label() == label)
            .map(|g| g.value)
    }
}

impl Serialize for GroupedMeasures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for g in &self.groups {
            map.serialize_entry(&g.key.label(), &g.value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Pearson r; NaN when either column has zero variance.
    pub coefficient: f64,
    pub x_column: String,
    pub y_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub x_column: String,
    pub y_column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    HoltWinters,
    SimpleAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub forecast_values: Vec<f64>,
    pub last_actual: f64,
    pub target_column: String,
    /// Always present: which model produced `forecast_values`.
    pub method: ForecastMethod,
    pub training_points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SmoothingParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Scalar(Measure),
    Grouped(GroupedMeasures),
    Correlation(CorrelationResult),
    Regression(RegressionResult),
    Forecast(ForecastResult),
}

impl ResultPayload {
    pub fn as_scalar(&self) -> Option<Measure> {
        match self {
            ResultPayload::Scalar(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&GroupedMeasures> {
        match self {
            ResultPayload::Grouped(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_correlation(&self) -> Option<&CorrelationResult> {
        match self {
            ResultPayload::Correlation(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_regression(&self) -> Option<&RegressionResult> {
        match self {
            ResultPayload::Regression(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_forecast(&self) -> Option<&ForecastResult> {
        match self {
            ResultPayload::Forecast(f) => Some(f),
            _ => None,
        }
    }
}
