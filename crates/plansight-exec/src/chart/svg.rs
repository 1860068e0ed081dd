//! Built-in SVG renderer on `plotters`.
//!
//! Draws onto a fixed 640x400 canvas. Column roles follow the plan:
//! `x_axis`/`y_axis` for line, bar and scatter (`target_column` stands in
//! for a missing `y_axis`), `target_column` for histogram and box, and every
//! numeric column for the correlation heatmap.

use chrono::DateTime;
use plotters::coord::Shift;
use plotters::data::Quartiles;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use plansight_core::schema::DataType;
use plansight_core::types::{format_temporal, Column, Frame, Scalar};
use plansight_operators::correlation::pearson;
use plansight_operators::numeric::{mean, observed, paired};
use plansight_planner::{ChartType, ExecutionPlan};

use super::{Chart, ChartError, ChartRenderer};

const SIZE: (u32, u32) = (640, 400);
const HISTOGRAM_BINS: usize = 30;
const FILL: RGBColor = RGBColor(0x4c, 0x72, 0xb0);
const CAPTION: (&str, u32) = ("sans-serif", 18);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl ChartRenderer for SvgRenderer {
    fn render(&self, frame: &Frame, plan: &ExecutionPlan) -> Result<Option<Chart>, ChartError> {
        let Some(kind) = plan.chart_type else {
            return Ok(None);
        };
        let document = match kind {
            ChartType::Line => line(frame, plan)?,
            ChartType::Bar => bar(frame, plan)?,
            ChartType::Scatter => scatter(frame, plan)?,
            ChartType::Histogram => histogram(frame, plan)?,
            ChartType::Box => box_plot(frame, plan)?,
            ChartType::Heatmap => heatmap(frame)?,
        };
        Ok(Some(Chart::svg(document)))
    }
}

/// Runs `draw` against a white canvas and returns the finished document.
fn draw_svg<F>(draw: F) -> Result<String, ChartError>
where
    F: FnOnce(&Area<'_>) -> Result<(), ChartError>,
{
    let mut document = String::new();
    {
        let root = SVGBackend::with_string(&mut document, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(document)
}

fn column<'a>(frame: &'a Frame, name: &str) -> Result<&'a Column, ChartError> {
    frame
        .column(name)
        .ok_or_else(|| ChartError::ColumnNotFound(name.to_string()))
}

fn numeric<'a>(frame: &'a Frame, name: &str) -> Result<&'a Column, ChartError> {
    let col = column(frame, name)?;
    if col.data_type != DataType::Numeric {
        return Err(ChartError::NotNumeric(name.to_string()));
    }
    Ok(col)
}

fn value_column(plan: &ExecutionPlan) -> Result<&str, ChartError> {
    plan.y_axis
        .as_deref()
        .or(plan.target_column.as_deref())
        .ok_or(ChartError::MissingInput("y_axis or target_column"))
}

fn target(plan: &ExecutionPlan) -> Result<&str, ChartError> {
    plan.target_column
        .as_deref()
        .ok_or(ChartError::MissingInput("target_column"))
}

/// Position of a cell on a continuous axis.
fn position(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Number(v) if v.is_finite() => Some(*v),
        Scalar::Temporal(t) => Some(t.and_utc().timestamp() as f64),
        Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Widens a range by 5% on each side; a single point gets a unit range.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span <= f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo - span * 0.05, hi + span * 0.05)
    }
}

fn axis_label(v: f64, temporal: bool) -> String {
    if !temporal {
        return format!("{}", v);
    }
    DateTime::from_timestamp(v as i64, 0)
        .map(|d| format_temporal(&d.naive_utc()))
        .unwrap_or_default()
}

fn line(frame: &Frame, plan: &ExecutionPlan) -> Result<String, ChartError> {
    let x_name = plan.x_axis.as_deref().ok_or(ChartError::MissingInput("x_axis"))?;
    let y_name = value_column(plan)?;
    let x = column(frame, x_name)?;
    let y = numeric(frame, y_name)?;
    let by_position = matches!(x.data_type, DataType::Numeric | DataType::Temporal);
    let temporal = x.data_type == DataType::Temporal;

    let mut points: Vec<(f64, f64)> = x
        .values
        .iter()
        .zip(&y.values)
        .enumerate()
        .filter_map(|(i, (xv, yv))| {
            let px = if by_position { position(xv)? } else { i as f64 };
            let py = yv.as_f64().filter(|v| v.is_finite())?;
            Some((px, py))
        })
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (x_lo, x_hi) = padded(bounds(points.iter().map(|p| p.0)).ok_or(ChartError::NoData)?);
    let (y_lo, y_hi) = padded(bounds(points.iter().map(|p| p.1)).ok_or(ChartError::NoData)?);
    let title = format!("{} over {}", y_name, x_name);

    draw_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, CAPTION)
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(56)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|v| axis_label(*v, temporal))
            .x_desc(x_name)
            .y_desc(y_name)
            .draw()?;
        chart.draw_series(LineSeries::new(points.iter().copied(), &FILL))?;
        Ok(())
    })
}

fn bar(frame: &Frame, plan: &ExecutionPlan) -> Result<String, ChartError> {
    let y_name = value_column(plan)?;
    let y = numeric(frame, y_name)?;

    let (title, bars): (String, Vec<(String, f64)>) = match plan.group_by.first() {
        Some(key_name) => {
            let key = column(frame, key_name)?;
            let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
            for (k, v) in key.values.iter().zip(&y.values) {
                let Some(v) = v.as_f64().filter(|v| v.is_finite()) else {
                    continue;
                };
                if k.is_null() {
                    continue;
                }
                let label = k.to_string();
                match groups.iter_mut().find(|(l, _)| *l == label) {
                    Some((_, vals)) => vals.push(v),
                    None => groups.push((label, vec![v])),
                }
            }
            let bars = groups.into_iter().map(|(l, vals)| (l, mean(&vals))).collect();
            (format!("mean {} by {}", y_name, key_name), bars)
        }
        None => {
            let x_name = plan.x_axis.as_deref().ok_or(ChartError::MissingInput("x_axis"))?;
            let x = column(frame, x_name)?;
            let bars = x
                .values
                .iter()
                .zip(&y.values)
                .filter_map(|(k, v)| Some((k.to_string(), v.as_f64().filter(|v| v.is_finite())?)))
                .collect();
            (format!("{} by {}", y_name, x_name), bars)
        }
    };

    let (lo, hi) = bounds(bars.iter().map(|b| b.1)).ok_or(ChartError::NoData)?;
    let (lo, hi) = padded((lo.min(0.0), hi.max(0.0)));
    let last = bars.len() as i32 - 1;

    draw_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, CAPTION)
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(56)
            .build_cartesian_2d((0..last).into_segmented(), lo..hi)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
                    .ok()
                    .and_then(|i| bars.get(i))
                    .map(|b| b.0.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .y_desc(y_name)
            .draw()?;
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(FILL.filled())
                .margin(8)
                .data(bars.iter().enumerate().map(|(i, b)| (i as i32, b.1))),
        )?;
        Ok(())
    })
}

fn scatter(frame: &Frame, plan: &ExecutionPlan) -> Result<String, ChartError> {
    let x_name = plan.x_axis.as_deref().ok_or(ChartError::MissingInput("x_axis"))?;
    let y_name = plan.y_axis.as_deref().ok_or(ChartError::MissingInput("y_axis"))?;
    let (xs, ys) = paired(numeric(frame, x_name)?, numeric(frame, y_name)?);

    let (x_lo, x_hi) = padded(bounds(xs.iter().copied()).ok_or(ChartError::NoData)?);
    let (y_lo, y_hi) = padded(bounds(ys.iter().copied()).ok_or(ChartError::NoData)?);
    let title = format!("{} vs {}", y_name, x_name);

    draw_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, CAPTION)
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(56)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart.configure_mesh().x_desc(x_name).y_desc(y_name).draw()?;
        chart.draw_series(
            xs.iter()
                .zip(&ys)
                .map(|(x, y)| Circle::new((*x, *y), 3, FILL.mix(0.7).filled())),
        )?;
        Ok(())
    })
}

/// Bin counts over `[lo, hi]`; the last bin is closed.
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    let Some((lo, hi)) = bounds(values.iter().copied()) else {
        return counts;
    };
    if bins == 0 {
        return counts;
    }
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

fn histogram(frame: &Frame, plan: &ExecutionPlan) -> Result<String, ChartError> {
    let name = target(plan)?;
    let values = observed(numeric(frame, name)?);
    let (lo, hi) = bounds(values.iter().copied()).ok_or(ChartError::NoData)?;
    let counts = histogram_counts(&values, HISTOGRAM_BINS);
    let peak = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let width = if hi > lo { (hi - lo) / HISTOGRAM_BINS as f64 } else { 1.0 };
    let title = format!("distribution of {}", name);

    draw_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, CAPTION)
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(48)
            .build_cartesian_2d((0..HISTOGRAM_BINS as i32 - 1).into_segmented(), 0f64..peak * 1.05)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(6)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    format!("{:.1}", lo + width * *i as f64)
                }
                SegmentValue::Last => String::new(),
            })
            .x_desc(name)
            .y_desc("count")
            .draw()?;
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(FILL.filled())
                .margin(1)
                .data(counts.iter().enumerate().map(|(i, n)| (i as i32, *n as f64))),
        )?;
        Ok(())
    })
}

fn box_plot(frame: &Frame, plan: &ExecutionPlan) -> Result<String, ChartError> {
    let name = target(plan)?;
    let values = observed(numeric(frame, name)?);
    let (lo, hi) = bounds(values.iter().copied()).ok_or(ChartError::NoData)?;
    let quartiles = Quartiles::new(&values);
    let [low, _, _, _, high] = quartiles.values();
    let (y_lo, y_hi) = padded((lo.min(low as f64), hi.max(high as f64)));
    let title = format!("{} (box)", name);

    draw_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, CAPTION)
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(56)
            .build_cartesian_2d((0..0).into_segmented(), y_lo as f32..y_hi as f32)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(1)
            .x_label_formatter(&|_| name.to_string())
            .draw()?;
        chart.draw_series(std::iter::once(
            Boxplot::new_vertical(SegmentValue::CenterOf(0), &quartiles)
                .width(60)
                .style(&FILL),
        ))?;
        chart.draw_series(
            values
                .iter()
                .map(|v| *v as f32)
                .filter(|v| *v < low || *v > high)
                .map(|v| Circle::new((SegmentValue::CenterOf(0), v), 3, FILL.filled())),
        )?;
        Ok(())
    })
}

/// Diverging blue-white-red for r in [-1, 1]; grey when undefined.
fn heat(r: f64) -> RGBColor {
    if !r.is_finite() {
        return RGBColor(0xcc, 0xcc, 0xcc);
    }
    let t = r.clamp(-1.0, 1.0);
    let fade = (255.0 * (1.0 - t.abs())).round() as u8;
    if t >= 0.0 {
        RGBColor(0xff, fade, fade)
    } else {
        RGBColor(fade, fade, 0xff)
    }
}

fn heatmap(frame: &Frame) -> Result<String, ChartError> {
    let columns: Vec<&Column> = frame
        .columns()
        .iter()
        .filter(|c| c.data_type == DataType::Numeric)
        .collect();
    if columns.is_empty() {
        return Err(ChartError::NoData);
    }
    let n = columns.len() as i32;
    let mut cells = Vec::with_capacity(columns.len() * columns.len());
    for (i, a) in columns.iter().enumerate() {
        for (j, b) in columns.iter().enumerate() {
            let (xs, ys) = paired(a, b);
            cells.push((j as i32, i as i32, pearson(&xs, &ys)));
        }
    }
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let name_at = |v: &i32| {
        usize::try_from(*v)
            .ok()
            .and_then(|i| names.get(i))
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    draw_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption("correlation matrix", CAPTION)
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(64)
            .build_cartesian_2d(0..n, n..0)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(columns.len() + 1)
            .y_labels(columns.len() + 1)
            .x_label_formatter(&name_at)
            .y_label_formatter(&name_at)
            .draw()?;
        chart.draw_series(
            cells
                .iter()
                .map(|(x, y, r)| Rectangle::new([(*x, *y), (*x + 1, *y + 1)], heat(*r).filled())),
        )?;
        chart.draw_series(cells.iter().map(|(x, y, r)| {
            let label = if r.is_finite() { format!("{:.2}", r) } else { "n/a".into() };
            EmptyElement::at((*x, *y)) + Text::new(label, (8, 8), ("sans-serif", 12).into_font())
        }))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_puts_maximum_in_last_bin() {
        let counts = histogram_counts(&[0.0, 1.0, 2.0, 3.0], 3);
        assert_eq!(counts, vec![1, 1, 2]);
        let flat = histogram_counts(&[5.0, 5.0], 30);
        assert_eq!(flat[0], 2);
    }

    #[test]
    fn heat_is_symmetric() {
        assert_eq!(heat(1.0), RGBColor(0xff, 0, 0));
        assert_eq!(heat(-1.0), RGBColor(0, 0, 0xff));
        assert_eq!(heat(0.0), RGBColor(0xff, 0xff, 0xff));
        assert_eq!(heat(f64::NAN), RGBColor(0xcc, 0xcc, 0xcc));
    }

    #[test]
    fn single_points_get_a_drawable_range() {
        assert_eq!(padded((3.0, 3.0)), (2.0, 4.0));
        let (lo, hi) = padded((0.0, 10.0));
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn temporal_axis_labels_are_dates() {
        assert_eq!(axis_label(0.0, true), "1970-01-01");
        assert_eq!(axis_label(2.5, false), "2.5");
    }
}
