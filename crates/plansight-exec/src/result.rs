//! The per-call execution result handed back to callers.

use serde::Serialize;

use plansight_core::error::ErrorKind;
use plansight_core::hash::Hash256;
use plansight_core::ops::Operation;
use plansight_operators::ResultPayload;

use crate::runtime::{Completed, ExecError};

/// Built fresh for every execution call; never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub operation: Option<Operation>,
    pub result: Option<ResultPayload>,
    /// `data:` URI of the rendered chart, if one was drawn.
    pub chart: Option<String>,
    pub filtered_row_count: usize,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
    pub plan_hash: Option<Hash256>,
}

/// What is known about a call when it stops, successful or not.
#[derive(Debug, Clone, Default)]
pub(crate) struct Progress {
    pub operation: Option<Operation>,
    pub filtered_row_count: usize,
    pub warnings: Vec<String>,
    pub plan_hash: Option<Hash256>,
}

impl ExecutionResult {
    pub(crate) fn completed(done: Completed) -> Self {
        Self {
            success: true,
            operation: Some(done.operation),
            result: Some(done.payload),
            chart: done.chart.map(|c| c.to_data_uri()),
            filtered_row_count: done.filtered_row_count,
            error: None,
            error_kind: None,
            validation_errors: Vec::new(),
            warnings: done.warnings,
            suggestions: Vec::new(),
            clarification_question: None,
            plan_hash: done.plan_hash,
        }
    }

    pub(crate) fn failed(err: ExecError, progress: Progress) -> Self {
        let (validation_errors, warnings) = match &err {
            ExecError::Rejected(verdict) => (verdict.errors.clone(), verdict.warnings.clone()),
            _ => (Vec::new(), progress.warnings),
        };
        let clarification_question = match &err {
            ExecError::ClarificationRequired(q) => Some(q.clone()),
            _ => None,
        };
        Self {
            success: false,
            operation: progress.operation,
            result: None,
            chart: None,
            filtered_row_count: progress.filtered_row_count,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            validation_errors,
            warnings,
            suggestions: err.suggestions(),
            clarification_question,
            plan_hash: progress.plan_hash,
        }
    }

    /// A failure raised before any plan was looked at.
    pub fn from_error(err: ExecError) -> Self {
        Self::failed(err, Progress::default())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
