//! Error handling, context and suggestion tests

mod test_data_gen;

use plansight_core::config::{EngineConfig, ForecastConfig};
use plansight_core::error::{Error, ErrorKind};
use plansight_core::schema::DataType;
use plansight_exec::{ExecError, ExecutionResult};
use plansight_io::error::Error as LoadError;
use plansight_operators::OpError;
use plansight_planner::{ExecutionPlan, PlanError};
use serde_json::json;
use test_data_gen::sales_engine;

#[test]
fn test_error_with_context() {
    let base_error = Error::Schema("duplicate column 'region'".to_string());
    let contextual_error = base_error.with_context("while loading sales.csv");

    match &contextual_error {
        Error::Context { context, .. } => assert_eq!(context, "while loading sales.csv"),
        _ => panic!("Expected Context variant"),
    }
    let msg = contextual_error.to_string();
    assert!(msg.contains("while loading sales.csv"));
    assert!(msg.contains("duplicate column 'region'"));
}

#[test]
fn test_error_suggestions() {
    let schema_error = Error::Schema("duplicate column 'region'".to_string());
    assert!(schema_error
        .suggestions()
        .iter()
        .any(|s| s.contains("header")));

    let config_error = Error::Config("forecast window must be positive".to_string());
    assert!(config_error
        .suggestions()
        .iter()
        .any(|s| s.contains("Forecast")));

    assert!(Error::Invariant("x".into()).suggestions().is_empty());
}

#[test]
fn test_config_validation() {
    assert!(EngineConfig::default().validate().is_ok());

    let cfg = EngineConfig {
        preview_rows: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(Error::Config(_))));

    let cfg = EngineConfig {
        forecast: ForecastConfig {
            season_length: 0,
            ..ForecastConfig::default()
        },
        ..EngineConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("season_length (0)"));
}

#[test]
fn test_operror_with_context() {
    let base_error = OpError::InsufficientData("need at least 2 paired observations".into());
    match base_error.with_context("regression") {
        OpError::InsufficientData(msg) => {
            assert!(msg.starts_with("regression: "));
            assert!(msg.contains("paired observations"));
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }

    let mismatch = OpError::TypeMismatch {
        column: "sales".into(),
        expected: DataType::Numeric,
        detail: "column is text".into(),
    };
    match mismatch.with_context("filter") {
        OpError::TypeMismatch { detail, column, .. } => {
            assert_eq!(column, "sales");
            assert_eq!(detail, "filter: column is text");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_operror_kinds() {
    let missing = OpError::ColumnNotFound {
        column: "Sales".into(),
        available: vec!["sales".into(), "units".into()],
    };
    assert_eq!(missing.kind(), ErrorKind::Data);
    assert_eq!(
        OpError::InsufficientData("x".into()).kind(),
        ErrorKind::Computation
    );
    assert_eq!(
        OpError::UnknownOperation("median".into()).kind(),
        ErrorKind::Computation
    );
}

#[test]
fn test_column_not_found_suggests_near_names() {
    let missing = OpError::ColumnNotFound {
        column: "Sales".into(),
        available: vec!["sales".into(), "units".into()],
    };
    let suggestions = missing.suggestions();
    assert!(suggestions.contains(&"Did you mean 'sales'?".to_string()));
    assert!(!suggestions.iter().any(|s| s.contains("units")));
}

#[test]
fn test_type_mismatch_suggestions_follow_expected_type() {
    let temporal = OpError::TypeMismatch {
        column: "date".into(),
        expected: DataType::Temporal,
        detail: "cannot compare with 'soon'".into(),
    };
    assert!(temporal.suggestions()[0].contains("2024-01-31"));
}

#[test]
fn test_exec_error_kinds() {
    assert_eq!(ExecError::NoDataLoaded.kind(), ErrorKind::State);
    assert_eq!(ExecError::EmptyResult.kind(), ErrorKind::Data);
    assert_eq!(
        ExecError::ClarificationRequired("which year?".into()).kind(),
        ErrorKind::Clarification
    );
    assert_eq!(
        ExecError::from(OpError::InsufficientData("x".into())).kind(),
        ErrorKind::Computation
    );
    let load = LoadError::TooLarge { size: 20, limit: 10 };
    let err = ExecError::from(load);
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.suggestions()[0].contains("PLANSIGHT_MAX_SOURCE_BYTES"));
}

#[test]
fn test_plan_error_carries_verdict() {
    let err = ExecutionPlan::from_value(&json!({"operation": "correlation"})).unwrap_err();
    match &err {
        PlanError::Invalid(verdict) => assert!(!verdict.valid),
        other => panic!("Expected Invalid, got {:?}", other),
    }
    assert!(err.to_string().contains("plan failed validation"));
    assert_eq!(ExecError::from(err).kind(), ErrorKind::Validation);
}

#[test]
fn test_failed_result_carries_suggestions() {
    let result = sales_engine().execute(&json!({
        "operation": "mean",
        "target_column": "Sales"
    }));
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Data));
    assert_eq!(result.error.as_deref(), Some("Column 'Sales' not found in dataset"));
    assert!(result
        .suggestions
        .contains(&"Did you mean 'sales'?".to_string()));
}

#[test]
fn test_result_from_error() {
    let result = ExecutionResult::from_error(ExecError::NoDataLoaded);
    assert!(!result.success);
    assert!(result.result.is_none());
    let json = result.to_json();
    assert_eq!(json["error_kind"], json!("state"));
    assert_eq!(json["success"], json!(false));
}
