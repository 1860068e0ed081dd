//! Operator trait + common interfaces.
//!
//! The exec runtime builds one operator per plan through the `Registry`,
//! then calls `eval` exactly once with the filtered frame.

use plansight_core::error::ErrorKind;
use plansight_core::schema::DataType;
use plansight_core::types::Frame;

use crate::payload::ResultPayload;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Type mismatch on column '{column}': {detail}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        detail: String,
    },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("missing parameter: {0}")]
    MissingParameter(String),
}

impl OpError {
    pub fn column_not_found(column: &str, frame: &Frame) -> Self {
        OpError::ColumnNotFound {
            column: column.to_string(),
            available: frame.column_names(),
        }
    }

    /// Add context to an error message.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            OpError::TypeMismatch {
                column,
                expected,
                detail,
            } => OpError::TypeMismatch {
                column,
                expected,
                detail: format!("{}: {}", ctx, detail),
            },
            OpError::InsufficientData(msg) => OpError::InsufficientData(format!("{}: {}", ctx, msg)),
            OpError::MissingParameter(msg) => OpError::MissingParameter(format!("{}: {}", ctx, msg)),
            other => other,
        }
    }

    /// Column/type problems are data errors; the rest are computation errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OpError::ColumnNotFound { .. } | OpError::TypeMismatch { .. } => ErrorKind::Data,
            OpError::MissingParameter(_) => ErrorKind::Data,
            OpError::InsufficientData(_) | OpError::UnknownOperation(_) => ErrorKind::Computation,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            OpError::ColumnNotFound { column, available } => {
                let wanted = column.to_lowercase();
                let mut out: Vec<String> = available
                    .iter()
                    .filter(|c| {
                        let c = c.to_lowercase();
                        c == wanted || c.contains(&wanted) || wanted.contains(&c)
                    })
                    .map(|c| format!("Did you mean '{}'?", c))
                    .collect();
                out.push("Check that the column name is spelled correctly".into());
                out
            }
            OpError::TypeMismatch { expected, .. } => match expected {
                DataType::Numeric => vec!["Use a numeric value for numeric columns".into()],
                DataType::Temporal => {
                    vec!["Use a date such as 2024-01-31 or 2024-01-31T12:00:00".into()]
                }
                DataType::Boolean => vec!["Use true or false for boolean columns".into()],
                DataType::Text => vec![],
            },
            OpError::InsufficientData(_) => {
                vec!["Relax the filters or choose columns with more observations".into()]
            }
            _ => vec![],
        }
    }
}

/// Trait that all analytics operators implement.
///
/// Invariants:
/// - `eval` reads the whole input frame and never mutates it.
/// - `eval` must be deterministic given the same input.
pub trait Operator: Send + Sync + 'static {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    fn eval(&self, input: &Frame) -> Result<ResultPayload, OpError>;
}
