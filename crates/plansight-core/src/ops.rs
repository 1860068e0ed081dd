//! The fixed set of analytics operations a plan may request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Mean,
    Sum,
    Count,
    Min,
    Max,
    Std,
    Correlation,
    Regression,
    Forecast,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Mean,
        Operation::Sum,
        Operation::Count,
        Operation::Min,
        Operation::Max,
        Operation::Std,
        Operation::Correlation,
        Operation::Regression,
        Operation::Forecast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Mean => "mean",
            Operation::Sum => "sum",
            Operation::Count => "count",
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::Std => "std",
            Operation::Correlation => "correlation",
            Operation::Regression => "regression",
            Operation::Forecast => "forecast",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Operation::ALL.iter().copied().find(|op| op.as_str() == s)
    }

    /// Scalar/grouped reductions (mean, sum, count, min, max, std).
    pub fn is_aggregation(&self) -> bool {
        matches!(
            self,
            Operation::Mean
                | Operation::Sum
                | Operation::Count
                | Operation::Min
                | Operation::Max
                | Operation::Std
        )
    }

    /// Aggregations that read `target_column` (everything but `count`).
    pub fn reads_target(&self) -> bool {
        self.is_aggregation() && *self != Operation::Count
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::parse(s).ok_or_else(|| format!("unknown operation: {}", s))
    }
}
