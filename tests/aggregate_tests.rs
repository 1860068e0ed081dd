//! Scalar and grouped aggregation through the engine

mod test_data_gen;

use plansight_core::error::ErrorKind;
use plansight_core::schema::DataType;
use plansight_core::types::{Column, Frame, Scalar};
use plansight_exec::ExecError;
use plansight_operators::payload::Measure;
use plansight_operators::OpError;
use serde_json::json;
use test_data_gen::{engine_with, numeric_column, sales_engine, text_column};

fn scalar(plan: serde_json::Value) -> f64 {
    let done = sales_engine().try_execute(&plan).unwrap();
    done.payload.as_scalar().unwrap().as_f64()
}

#[test]
fn test_scalar_aggregations_skip_nulls() {
    assert_eq!(scalar(json!({"operation": "sum", "target_column": "sales"})), 750.0);
    assert_eq!(scalar(json!({"operation": "mean", "target_column": "sales"})), 150.0);
    assert_eq!(scalar(json!({"operation": "min", "target_column": "sales"})), 50.0);
    assert_eq!(scalar(json!({"operation": "max", "target_column": "sales"})), 250.0);
    let std = scalar(json!({"operation": "std", "target_column": "sales"}));
    assert!((std - 79.05694150420949).abs() < 1e-9);
}

#[test]
fn test_count_is_row_cardinality() {
    let done = sales_engine()
        .try_execute(&json!({"operation": "count"}))
        .unwrap();
    assert_eq!(done.payload.as_scalar(), Some(Measure::Count(6)));

    let done = sales_engine()
        .try_execute(&json!({"operation": "count", "target_column": "sales"}))
        .unwrap();
    assert_eq!(done.payload.as_scalar(), Some(Measure::Count(6)));
    assert_eq!(done.warnings, vec!["Operation 'count' ignores target_column".to_string()]);
}

#[test]
fn test_filtered_aggregation() {
    let value = scalar(json!({
        "operation": "mean",
        "target_column": "sales",
        "filters": [{"column": "product", "operator": "==", "value": "Widget"}]
    }));
    // 100, 200, 250 (the fourth Widget row has no sales)
    assert!((value - 550.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_grouped_mean_in_first_occurrence_order() {
    let done = sales_engine()
        .try_execute(&json!({"operation": "mean", "target_column": "sales", "group_by": ["region"]}))
        .unwrap();
    let grouped = done.payload.as_grouped().unwrap();
    let labels: Vec<String> = grouped.groups.iter().map(|g| g.key.label()).collect();
    assert_eq!(labels, vec!["North", "South", "East"]);
    assert_eq!(grouped.get("North"), Some(Measure::Value(125.0)));
    assert_eq!(grouped.get("South"), Some(Measure::Value(225.0)));
    assert_eq!(grouped.get("East"), Some(Measure::Value(50.0)));

    let json = serde_json::to_value(&done.payload).unwrap();
    assert_eq!(json, json!({"North": 125.0, "South": 225.0, "East": 50.0}));
}

#[test]
fn test_grouped_count_by_two_columns() {
    let done = sales_engine()
        .try_execute(&json!({"operation": "count", "group_by": ["region", "product"]}))
        .unwrap();
    let grouped = done.payload.as_grouped().unwrap();
    assert_eq!(grouped.get(r#"["North","Widget"]"#), Some(Measure::Count(2)));
    assert_eq!(grouped.get(r#"["North","Gadget"]"#), Some(Measure::Count(1)));
    assert_eq!(grouped.get(r#"["South","Widget"]"#), Some(Measure::Count(2)));
    assert_eq!(grouped.len(), 4);
}

#[test]
fn test_multi_column_labels_keep_comma_values_apart() {
    let frame = Frame::new(vec![
        text_column("a", &["x, y", "x"]),
        text_column("b", &["z", "y, z"]),
        numeric_column("v", &[1.0, 2.0]),
    ])
    .unwrap();
    let done = engine_with(frame)
        .try_execute(&json!({"operation": "sum", "target_column": "v", "group_by": ["a", "b"]}))
        .unwrap();
    let grouped = done.payload.as_grouped().unwrap();
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.get(r#"["x, y","z"]"#), Some(Measure::Value(1.0)));
    assert_eq!(grouped.get(r#"["x","y, z"]"#), Some(Measure::Value(2.0)));

    let json = serde_json::to_value(&done.payload).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
}

#[test]
fn test_group_with_only_null_targets_is_undefined() {
    let frame = Frame::new(vec![
        text_column("k", &["a", "b"]),
        Column::new("v", DataType::Numeric, vec![Scalar::Number(1.0), Scalar::Null]),
    ])
    .unwrap();
    let done = engine_with(frame)
        .try_execute(&json!({"operation": "mean", "target_column": "v", "group_by": ["k"]}))
        .unwrap();
    let json = serde_json::to_value(&done.payload).unwrap();
    assert_eq!(json, json!({"a": 1.0, "b": null}));
}

#[test]
fn test_missing_target_defaults_to_sole_numeric_column() {
    let frame = Frame::new(vec![
        text_column("k", &["a", "b", "c"]),
        numeric_column("v", &[1.0, 2.0, 6.0]),
    ])
    .unwrap();
    let done = engine_with(frame)
        .try_execute(&json!({"operation": "sum"}))
        .unwrap();
    assert_eq!(done.payload.as_scalar(), Some(Measure::Value(9.0)));
}

#[test]
fn test_missing_target_with_several_numeric_columns_fails() {
    let err = sales_engine()
        .try_execute(&json!({"operation": "mean"}))
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(matches!(err, ExecError::Operator(OpError::MissingParameter(_))));
}

#[test]
fn test_text_target_is_type_mismatch() {
    let err = sales_engine()
        .try_execute(&json!({"operation": "sum", "target_column": "region"}))
        .err()
        .unwrap();
    assert!(matches!(err, ExecError::Operator(OpError::TypeMismatch { .. })));
    assert_eq!(
        err.to_string(),
        "Type mismatch on column 'region': column 'region' is text, expected numeric"
    );
}

#[test]
fn test_std_of_single_value_is_null_in_json() {
    let result = sales_engine().execute(&json!({
        "operation": "std",
        "target_column": "sales",
        "filters": [{"column": "region", "operator": "==", "value": "East"}]
    }));
    assert!(result.success);
    assert_eq!(result.to_json()["result"], json!(null));
}
