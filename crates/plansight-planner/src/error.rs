use thiserror::Error;

use crate::plan::Verdict;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid JSON plan document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML plan document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("plan failed validation: {}", .0.errors.join("; "))]
    Invalid(Verdict),
}
