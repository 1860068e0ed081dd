//! Typed execution plan.
//!
//! Plans arrive untyped (`serde_json::Value`) and are only converted into an
//! `ExecutionPlan` once `validate` accepts them. Filter literals stay untyped
//! until the filter engine coerces them against the loaded column.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use plansight_core::compare::CmpOp;
use plansight_core::ops::Operation;

use crate::error::PlanError;
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Scatter,
    Heatmap,
    Box,
    Histogram,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Line,
        ChartType::Bar,
        ChartType::Scatter,
        ChartType::Heatmap,
        ChartType::Box,
        ChartType::Histogram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Scatter => "scatter",
            ChartType::Heatmap => "heatmap",
            ChartType::Box => "box",
            ChartType::Histogram => "histogram",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        ChartType::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `column OP value`; `value` is coerced at filter-application time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    pub operator: CmpOp,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub operation: Operation,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub time_column: Option<String>,
    #[serde(default)]
    pub x_axis: Option<String>,
    #[serde(default)]
    pub y_axis: Option<String>,
    #[serde(default)]
    pub chart_type: Option<ChartType>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub requires_clarification: bool,
    #[serde(default)]
    pub clarification_question: Option<String>,
}

impl ExecutionPlan {
    /// A plan with only `operation` set.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            target_column: None,
            filters: Vec::new(),
            group_by: Vec::new(),
            time_column: None,
            x_axis: None,
            y_axis: None,
            chart_type: None,
            requires_clarification: false,
            clarification_question: None,
        }
    }

    /// Validate, then convert. Blank optional strings become `None`.
    pub fn from_value(value: &Value) -> Result<Self, PlanError> {
        let verdict = validate(value);
        if !verdict.valid {
            return Err(PlanError::Invalid(verdict));
        }
        let mut plan: ExecutionPlan = serde_json::from_value(value.clone())?;
        for slot in [
            &mut plan.target_column,
            &mut plan.time_column,
            &mut plan.x_axis,
            &mut plan.y_axis,
            &mut plan.clarification_question,
        ] {
            if slot.as_deref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *slot = None;
            }
        }
        Ok(plan)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn null_as_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

/// Outcome of plan validation. Errors block execution; warnings never do.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Verdict {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
