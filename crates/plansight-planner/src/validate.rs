//! Plan validation.
//!
//! `validate` is total over any JSON value: malformed input is reported as
//! itemized errors, never as a panic or an `Err`. Every rule runs; failures
//! accumulate in rule order. The dataset is never consulted, so a plan can be
//! checked before anything is loaded.

use std::collections::HashSet;

use serde_json::{Map, Value};

use plansight_core::compare::CmpOp;
use plansight_core::ops::Operation;

use crate::plan::{ChartType, Verdict};

const KNOWN_FIELDS: [&str; 10] = [
    "operation",
    "target_column",
    "filters",
    "group_by",
    "time_column",
    "x_axis",
    "y_axis",
    "chart_type",
    "requires_clarification",
    "clarification_question",
];

const STRING_FIELDS: [&str; 5] = [
    "target_column",
    "time_column",
    "x_axis",
    "y_axis",
    "clarification_question",
];

pub fn validate(plan: &Value) -> Verdict {
    let Some(obj) = plan.as_object() else {
        return Verdict::new(
            vec![format!("Plan must be an object, got {}", kind_name(plan))],
            Vec::new(),
        );
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let operation = check_operation(obj, &mut errors);
    check_filters(obj, &mut errors);
    check_group_by(obj, &mut errors);
    check_chart_type(obj, &mut errors);
    check_string_fields(obj, &mut errors);
    check_clarification(obj, &mut errors);
    if let Some(op) = operation {
        check_requirements(op, obj, &mut errors, &mut warnings);
    }
    check_chart_inputs(obj, &mut warnings);

    for key in obj.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            warnings.push(format!("Unknown field '{}' is ignored", key));
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "validated plan"
    );

    Verdict::new(errors, warnings)
}

fn check_operation(obj: &Map<String, Value>, errors: &mut Vec<String>) -> Option<Operation> {
    match obj.get("operation") {
        None | Some(Value::Null) => {
            errors.push("Missing required field: 'operation'".into());
            None
        }
        Some(Value::String(s)) => match Operation::parse(s) {
            Some(op) => Some(op),
            None => {
                errors.push(invalid_operation(&format!("'{}'", s)));
                None
            }
        },
        Some(other) => {
            errors.push(invalid_operation(&other.to_string()));
            None
        }
    }
}

fn invalid_operation(shown: &str) -> String {
    let allowed: Vec<&str> = Operation::ALL.iter().map(|op| op.as_str()).collect();
    format!(
        "Invalid operation {}. Must be one of: {}",
        shown,
        allowed.join(", ")
    )
}

fn check_filters(obj: &Map<String, Value>, errors: &mut Vec<String>) {
    let Some(filters) = obj.get("filters") else {
        return;
    };
    let Some(items) = filters.as_array() else {
        errors.push("'filters' must be an array".into());
        return;
    };
    for (index, item) in items.iter().enumerate() {
        check_filter(item, index, errors);
    }
}

fn check_filter(item: &Value, index: usize, errors: &mut Vec<String>) {
    let Some(filter) = item.as_object() else {
        errors.push(format!("Filter at index {} must be an object", index));
        return;
    };

    match filter.get("column") {
        None => errors.push(format!("Filter at index {} missing 'column'", index)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(format!("Filter at index {} has an empty 'column'", index))
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("Filter at index {} 'column' must be a string", index)),
    }

    match filter.get("operator") {
        None => errors.push(format!("Filter at index {} missing 'operator'", index)),
        Some(op) => {
            if op.as_str().and_then(CmpOp::parse).is_none() {
                let allowed: Vec<&str> = CmpOp::ALL.iter().map(|o| o.symbol()).collect();
                let shown = match op {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                errors.push(format!(
                    "Filter at index {} has invalid operator '{}'. Must be one of: {}",
                    index,
                    shown,
                    allowed.join(", ")
                ));
            }
        }
    }

    if !filter.contains_key("value") {
        errors.push(format!("Filter at index {} missing 'value'", index));
    }
}

fn check_group_by(obj: &Map<String, Value>, errors: &mut Vec<String>) {
    let Some(group_by) = obj.get("group_by") else {
        return;
    };
    let Some(items) = group_by.as_array() else {
        errors.push("'group_by' must be an array".into());
        return;
    };
    if !items.iter().all(Value::is_string) {
        errors.push("All 'group_by' elements must be strings".into());
        return;
    }
    let mut seen = HashSet::new();
    for col in items.iter().filter_map(Value::as_str) {
        if col.trim().is_empty() {
            errors.push("'group_by' elements must be non-empty".into());
        } else if !seen.insert(col) {
            errors.push(format!("Duplicate column '{}' in 'group_by'", col));
        }
    }
}

fn check_chart_type(obj: &Map<String, Value>, errors: &mut Vec<String>) {
    let valid = match obj.get("chart_type") {
        None | Some(Value::Null) => return,
        Some(Value::String(s)) => ChartType::parse(s).is_some(),
        Some(_) => false,
    };
    if !valid {
        let shown = match &obj["chart_type"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let allowed: Vec<&str> = ChartType::ALL.iter().map(|c| c.as_str()).collect();
        errors.push(format!(
            "Invalid chart_type '{}'. Must be one of: {}",
            shown,
            allowed.join(", ")
        ));
    }
}

fn check_string_fields(obj: &Map<String, Value>, errors: &mut Vec<String>) {
    for key in STRING_FIELDS {
        match obj.get(key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => errors.push(format!("'{}' must be a string", key)),
        }
    }
}

fn check_clarification(obj: &Map<String, Value>, errors: &mut Vec<String>) {
    let requires = match obj.get("requires_clarification") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            errors.push("'requires_clarification' must be a boolean".into());
            return;
        }
    };
    if requires && present_str(obj, "clarification_question").is_none() {
        errors.push(
            "When requires_clarification is true, clarification_question must be provided".into(),
        );
    }
}

fn check_requirements(
    op: Operation,
    obj: &Map<String, Value>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    match op {
        Operation::Mean | Operation::Sum | Operation::Std | Operation::Min | Operation::Max => {
            if present_str(obj, "target_column").is_none() {
                warnings.push(format!("Operation '{}' typically requires target_column", op));
            }
        }
        Operation::Count => {
            if present_str(obj, "target_column").is_some() {
                warnings.push("Operation 'count' ignores target_column".into());
            }
        }
        Operation::Correlation | Operation::Regression => {
            for axis in ["x_axis", "y_axis"] {
                if present_str(obj, axis).is_none() {
                    errors.push(format!("Operation '{}' requires {}", op, axis));
                }
            }
        }
        Operation::Forecast => {
            for field in ["time_column", "target_column"] {
                if present_str(obj, field).is_none() {
                    errors.push(format!("Operation 'forecast' requires {}", field));
                }
            }
        }
    }
}

/// Advisory only: a chart whose inputs are missing renders nothing.
fn check_chart_inputs(obj: &Map<String, Value>, warnings: &mut Vec<String>) {
    let Some(chart) = obj
        .get("chart_type")
        .and_then(Value::as_str)
        .and_then(ChartType::parse)
    else {
        return;
    };
    let has = |key: &str| present_str(obj, key).is_some();
    let ready = match chart {
        ChartType::Line | ChartType::Bar => has("x_axis") && (has("y_axis") || has("target_column")),
        ChartType::Scatter => has("x_axis") && has("y_axis"),
        ChartType::Histogram | ChartType::Box => has("target_column"),
        ChartType::Heatmap => true,
    };
    if !ready {
        warnings.push(format!(
            "chart_type '{}' is missing its axis columns; no chart will be drawn",
            chart
        ));
    }
}

/// A non-blank string value under `key`.
fn present_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
