//! SVG chart renderer

mod test_data_gen;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use plansight_core::config::EngineConfig;
use plansight_core::ops::Operation;
use plansight_exec::{BestEffort, ChartError, ChartRenderer, Engine, SvgRenderer};
use plansight_planner::{ChartType, ExecutionPlan};
use serde_json::json;
use plansight_core::types::Frame;
use test_data_gen::{numeric_column, sales_frame};

fn plan(chart: ChartType) -> ExecutionPlan {
    let mut plan = ExecutionPlan::new(Operation::Count);
    plan.chart_type = Some(chart);
    plan
}

fn svg(plan: &ExecutionPlan) -> String {
    let chart = SvgRenderer
        .render(&sales_frame(), plan)
        .unwrap()
        .expect("chart drawn");
    assert_eq!(chart.mime, "image/svg+xml");
    String::from_utf8(chart.bytes).unwrap()
}

#[test]
fn test_no_chart_type_draws_nothing() {
    let plan = ExecutionPlan::new(Operation::Count);
    assert!(SvgRenderer.render(&sales_frame(), &plan).unwrap().is_none());
}

#[test]
fn test_line_chart() {
    let mut p = plan(ChartType::Line);
    p.x_axis = Some("date".into());
    p.y_axis = Some("units".into());
    let doc = svg(&p);
    assert!(doc.contains("<svg"));
    assert!(doc.trim_end().ends_with("</svg>"));
    assert!(doc.contains("<polyline"));
    assert!(doc.contains("units over date"));
    // temporal x ticks are printed as dates
    assert!(doc.contains("2024-01-0"));
}

#[test]
fn test_grouped_bar_chart_has_one_bar_per_group() {
    let mut p = plan(ChartType::Bar);
    p.target_column = Some("sales".into());
    p.group_by = vec!["region".into()];
    let doc = svg(&p);
    assert!(doc.contains("mean sales by region"));
    assert!(doc.contains("North"));
    assert!(doc.contains("East"));
    // background plus one bar per region
    assert!(doc.matches("<rect").count() >= 4);
}

#[test]
fn test_scatter_skips_incomplete_rows() {
    let mut p = plan(ChartType::Scatter);
    p.x_axis = Some("units".into());
    p.y_axis = Some("sales".into());
    assert_eq!(svg(&p).matches("<circle").count(), 5);
}

#[test]
fn test_histogram_has_thirty_bins() {
    let mut p = plan(ChartType::Histogram);
    p.target_column = Some("units".into());
    let doc = svg(&p);
    assert!(doc.contains("distribution of units"));
    assert!(doc.matches("<rect").count() >= 1 + 30);
}

#[test]
fn test_box_plot() {
    let mut p = plan(ChartType::Box);
    p.target_column = Some("units".into());
    let doc = svg(&p);
    assert!(doc.contains("units (box)"));
    assert_eq!(doc.matches("<circle").count(), 0);
}

#[test]
fn test_box_plot_marks_values_beyond_the_whiskers() {
    let frame = Frame::new(vec![numeric_column("v", &[1.0, 2.0, 3.0, 4.0, 100.0])]).unwrap();
    let mut p = plan(ChartType::Box);
    p.target_column = Some("v".into());
    let chart = SvgRenderer.render(&frame, &p).unwrap().unwrap();
    let doc = String::from_utf8(chart.bytes).unwrap();
    assert_eq!(doc.matches("<circle").count(), 1);
}

#[test]
fn test_heatmap_covers_numeric_columns() {
    let doc = svg(&plan(ChartType::Heatmap));
    // sales and units: a 2x2 matrix, perfectly correlated
    assert!(doc.contains("correlation matrix"));
    assert!(doc.matches("<rect").count() >= 1 + 4);
    assert!(doc.contains("1.00"));
    assert!(!doc.contains("n/a"));
}

#[test]
fn test_missing_inputs_are_chart_errors() {
    let mut p = plan(ChartType::Scatter);
    p.x_axis = Some("units".into());
    assert!(matches!(
        SvgRenderer.render(&sales_frame(), &p),
        Err(ChartError::MissingInput("y_axis"))
    ));

    p.y_axis = Some("region".into());
    assert!(matches!(
        SvgRenderer.render(&sales_frame(), &p),
        Err(ChartError::NotNumeric(_))
    ));
}

#[test]
fn test_best_effort_swallows_errors() {
    let mut p = plan(ChartType::Histogram);
    p.target_column = Some("missing".into());
    assert!(BestEffort::new(SvgRenderer).render(&sales_frame(), &p).is_none());
}

#[test]
fn test_data_uri_decodes_to_svg() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.load_frame(sales_frame());
    let result = engine.execute(&json!({
        "operation": "correlation",
        "x_axis": "units",
        "y_axis": "sales",
        "chart_type": "scatter"
    }));
    let uri = result.chart.unwrap();
    let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
    let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
    assert!(decoded.contains("sales vs units"));
}

#[test]
fn test_charts_disabled_by_config() {
    let cfg = EngineConfig {
        charts_enabled: false,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(cfg);
    engine.load_frame(sales_frame());
    let result = engine.execute(&json!({"operation": "count", "chart_type": "heatmap"}));
    assert!(result.success);
    assert!(result.chart.is_none());
}
