//! Session registry: isolation between datasets and concurrent execution

mod test_data_gen;

use std::sync::Arc;
use std::thread;

use plansight_core::config::EngineConfig;
use plansight_core::id::SessionId;
use plansight_exec::{SessionError, SessionRegistry};
use serde_json::json;
use test_data_gen::{seasonal_series, series_csv, write_csv, SALES_CSV};

fn registry() -> SessionRegistry {
    SessionRegistry::new(EngineConfig {
        charts_enabled: false,
        ..EngineConfig::default()
    })
}

#[test]
fn test_create_execute_remove() {
    let sessions = registry();
    let (id, summary) = sessions.create_from_bytes(SALES_CSV.as_bytes()).unwrap();
    assert_eq!(summary.row_count, 6);
    assert_eq!(sessions.len(), 1);

    let result = sessions
        .execute(id, &json!({"operation": "count"}))
        .unwrap();
    assert!(result.success);
    assert_eq!(result.to_json()["result"], json!(6));

    assert_eq!(sessions.info(id).unwrap().columns.len(), 6);
    assert!(sessions.remove(id));
    assert!(!sessions.remove(id));
    assert!(sessions.is_empty());
}

#[test]
fn test_unknown_session() {
    let sessions = registry();
    let id = SessionId::new();
    assert!(sessions.info(id).is_none());
    assert!(sessions.get(id).is_none());
    match sessions.execute(id, &json!({"operation": "count"})) {
        Err(SessionError::NotFound(missing)) => assert_eq!(missing, id),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_sessions_are_isolated() {
    let sessions = registry();
    let (sales, _) = sessions.create_from_bytes(SALES_CSV.as_bytes()).unwrap();
    let (series, _) = sessions
        .create_from_bytes(series_csv(&seasonal_series(8)).as_bytes())
        .unwrap();
    assert_ne!(sales, series);

    let result = sessions
        .execute(series, &json!({"operation": "count"}))
        .unwrap();
    assert_eq!(result.to_json()["result"], json!(8));

    let result = sessions
        .execute(series, &json!({"operation": "sum", "target_column": "sales"}))
        .unwrap();
    assert!(!result.success);
}

#[test]
fn test_failed_create_registers_nothing() {
    let sessions = registry();
    let err = sessions.create_from_bytes(b"a,b\n1\n").unwrap_err();
    assert!(matches!(err, SessionError::Exec(_)));
    assert!(sessions.is_empty());
}

#[test]
fn test_create_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "sales.csv", SALES_CSV);
    let sessions = registry();
    let (id, _) = sessions.create_from_path(&path).unwrap();
    assert_eq!(sessions.info(id).unwrap().row_count, 6);
}

#[test]
fn test_reload_replaces_dataset() {
    let sessions = registry();
    let (id, _) = sessions.create_from_bytes(SALES_CSV.as_bytes()).unwrap();
    sessions.reload_bytes(id, b"v\n1\n2\n").unwrap();
    assert_eq!(sessions.info(id).unwrap().columns, vec!["v"]);
    assert!(sessions.reload_bytes(id, b"v,w\n1\n").is_err());
    assert_eq!(sessions.info(id).unwrap().row_count, 2);
}

#[test]
fn test_concurrent_sessions() {
    let sessions = Arc::new(registry());
    let ids: Vec<SessionId> = (0..4)
        .map(|_| sessions.create_from_bytes(SALES_CSV.as_bytes()).unwrap().0)
        .collect();

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let sessions = Arc::clone(&sessions);
            thread::spawn(move || {
                (0..10)
                    .map(|_| {
                        sessions
                            .execute(id, &json!({"operation": "mean", "target_column": "sales"}))
                            .unwrap()
                            .to_json()["result"]
                            .clone()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for value in handle.join().unwrap() {
            assert_eq!(value, json!(150.0));
        }
    }
}
