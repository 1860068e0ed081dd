//! YAML → plan value.
//!
//! Example:
//! ```yaml
//! operation: mean
//! target_column: sales
//! filters:
//!   - { column: region, operator: "==", value: North }
//! group_by: [product]
//! chart_type: bar
//! ```

use serde_json::Value;

use crate::error::PlanError;

/// Parse YAML text into the JSON value model. An empty document is `null`,
/// which the validator then rejects as a non-object plan.
pub fn parse_yaml_plan(yaml_src: &str) -> Result<Value, PlanError> {
    if yaml_src.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_yaml::from_str::<Value>(yaml_src)?)
}
