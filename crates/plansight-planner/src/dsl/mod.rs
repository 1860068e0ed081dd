//! Plan documents.
//!
//! Plans are exchanged as JSON objects. YAML documents are accepted as an
//! authoring convenience and converted into the same JSON value model, so the
//! validator only ever sees `serde_json::Value`.

pub mod yaml;

use std::path::Path;

use serde_json::Value;

use crate::error::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Json,
    Yaml,
}

impl PlanFormat {
    /// `.yaml`/`.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                PlanFormat::Yaml
            }
            _ => PlanFormat::Json,
        }
    }
}

/// Parse a plan document into an untyped value. Only syntax is checked here;
/// call `validate` for the verdict.
pub fn parse_plan_document(src: &str, format: PlanFormat) -> Result<Value, PlanError> {
    match format {
        PlanFormat::Json => Ok(serde_json::from_str(src)?),
        PlanFormat::Yaml => yaml::parse_yaml_plan(src),
    }
}
