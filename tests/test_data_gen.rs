//! Test data generation utilities for the plansight test suite
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use plansight_core::schema::DataType;
use plansight_core::types::{parse_temporal, Column, Frame, Scalar};
use plansight_exec::Engine;
use plansight_core::config::EngineConfig;

/// Six sales rows; the last `sales` cell is empty.
pub const SALES_CSV: &str = "\
date,region,product,sales,units,returned
2024-01-01,North,Widget,100,10,false
2024-01-02,South,Widget,200,20,false
2024-01-03,North,Gadget,150,15,true
2024-01-04,East,Gadget,50,5,false
2024-01-05,South,Widget,250,25,false
2024-01-06,North,Widget,,8,false
";

pub fn num(v: f64) -> Scalar {
    Scalar::Number(v)
}

pub fn text(s: &str) -> Scalar {
    Scalar::Text(s.to_string())
}

pub fn date(s: &str) -> Scalar {
    Scalar::Temporal(parse_temporal(s).expect("valid date literal"))
}

pub fn numeric_column(name: &str, values: &[f64]) -> Column {
    Column::new(name, DataType::Numeric, values.iter().map(|v| num(*v)).collect())
}

pub fn text_column(name: &str, values: &[&str]) -> Column {
    Column::new(name, DataType::Text, values.iter().map(|v| text(v)).collect())
}

/// The `SALES_CSV` rows built directly as a frame.
pub fn sales_frame() -> Frame {
    let dates = (1..=6).map(|d| date(&format!("2024-01-{:02}", d))).collect();
    let mut sales: Vec<Scalar> = [100.0, 200.0, 150.0, 50.0, 250.0].iter().map(|v| num(*v)).collect();
    sales.push(Scalar::Null);
    Frame::new(vec![
        Column::new("date", DataType::Temporal, dates),
        text_column("region", &["North", "South", "North", "East", "South", "North"]),
        text_column("product", &["Widget", "Widget", "Gadget", "Gadget", "Widget", "Widget"]),
        Column::new("sales", DataType::Numeric, sales),
        numeric_column("units", &[10.0, 20.0, 15.0, 5.0, 25.0, 8.0]),
        Column::new(
            "returned",
            DataType::Boolean,
            [false, false, true, false, false, false]
                .iter()
                .map(|b| Scalar::Bool(*b))
                .collect(),
        ),
    ])
    .expect("sales frame is well formed")
}

/// Quarterly revenue: linear trend plus a period-4 season, starting 2021-01-01.
pub fn seasonal_series(points: usize) -> Vec<f64> {
    let season = [3.0, -1.0, -4.0, 2.0];
    (0..points)
        .map(|t| 100.0 + 5.0 * t as f64 + season[t % 4])
        .collect()
}

pub fn quarter_label(t: usize) -> String {
    let year = 2021 + t / 4;
    let month = 1 + 3 * (t % 4);
    format!("{}-{:02}-01", year, month)
}

/// A `date,revenue` frame over `values`, rows in the given time order.
pub fn series_frame(values: &[f64]) -> Frame {
    Frame::new(vec![
        Column::new(
            "date",
            DataType::Temporal,
            (0..values.len()).map(|t| date(&quarter_label(t))).collect(),
        ),
        numeric_column("revenue", values),
    ])
    .expect("series frame is well formed")
}

pub fn series_csv(values: &[f64]) -> String {
    let mut out = String::from("date,revenue\n");
    for (t, v) in values.iter().enumerate() {
        out.push_str(&format!("{},{}\n", quarter_label(t), v));
    }
    out
}

pub fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write csv fixture");
    path
}

/// An engine with charts disabled and `frame` loaded.
pub fn engine_with(frame: Frame) -> Engine {
    let cfg = EngineConfig {
        charts_enabled: false,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(cfg);
    engine.load_frame(frame);
    engine
}

pub fn sales_engine() -> Engine {
    engine_with(sales_frame())
}
