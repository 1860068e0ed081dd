//! Time-series forecast.
//!
//! The series is the target column ordered by the time column (stable, nulls
//! last) with missing targets dropped. The most recent `window` points are
//! fitted with additive Holt-Winters; when that model cannot be fitted the
//! forecast is the window mean repeated `horizon` times. Either way the
//! payload names the method that produced it.

use plansight_core::compare::sort_cmp;
use plansight_core::config::ForecastConfig;
use plansight_core::types::Frame;

use crate::numeric::{mean, numeric_column};
use crate::payload::{ForecastMethod, ForecastResult, ResultPayload, SmoothingParams};
use crate::traits::{OpError, Operator};

/// Smoothing parameter grid: 0.05, 0.10, ..., 0.95.
const GRID_STEPS: usize = 19;

fn grid() -> impl Iterator<Item = f64> + Clone {
    (1..=GRID_STEPS).map(|i| i as f64 * 0.05)
}

/// A fitted additive Holt-Winters model.
#[derive(Debug, Clone, PartialEq)]
pub struct HoltWinters {
    pub params: SmoothingParams,
    pub sse: f64,
    level: f64,
    trend: f64,
    season: Vec<f64>,
    /// Observations consumed; fixes the seasonal phase of the next step.
    observed: usize,
}

impl HoltWinters {
    /// Grid-search the smoothing parameters minimizing one-step-ahead SSE.
    ///
    /// Needs two full seasons. Ties keep the first parameter set visited.
    pub fn fit(series: &[f64], period: usize) -> Option<Self> {
        if period == 0 || series.len() < 2 * period {
            return None;
        }
        let mut best: Option<HoltWinters> = None;
        for alpha in grid() {
            for beta in grid() {
                for gamma in grid() {
                    let params = SmoothingParams { alpha, beta, gamma };
                    let Some(model) = Self::run(series, period, params) else {
                        continue;
                    };
                    if best.as_ref().map_or(true, |b| model.sse < b.sse) {
                        best = Some(model);
                    }
                }
            }
        }
        best
    }

    fn run(series: &[f64], period: usize, params: SmoothingParams) -> Option<Self> {
        let m = period as f64;
        let first = mean(&series[..period]);
        let second = mean(&series[period..2 * period]);
        let slope = (second - first) / m;
        let base = first - slope * (m - 1.0) / 2.0;

        let mut season: Vec<f64> = series[..period]
            .iter()
            .enumerate()
            .map(|(i, y)| y - (base + slope * i as f64))
            .collect();
        let mut level = base - slope;
        let mut trend = slope;
        let mut sse = 0.0;

        let SmoothingParams { alpha, beta, gamma } = params;
        for (t, &y) in series.iter().enumerate() {
            let phase = t % period;
            let predicted = level + trend + season[phase];
            sse += (y - predicted).powi(2);

            let next_level = alpha * (y - season[phase]) + (1.0 - alpha) * (level + trend);
            trend = beta * (next_level - level) + (1.0 - beta) * trend;
            season[phase] = gamma * (y - next_level) + (1.0 - gamma) * season[phase];
            level = next_level;
        }

        if !sse.is_finite() || !level.is_finite() || !trend.is_finite() {
            return None;
        }
        Some(Self {
            params,
            sse,
            level,
            trend,
            season,
            observed: series.len(),
        })
    }

    pub fn predict(&self, horizon: usize) -> Vec<f64> {
        let period = self.season.len();
        (1..=horizon)
            .map(|h| {
                self.level + h as f64 * self.trend + self.season[(self.observed + h - 1) % period]
            })
            .collect()
    }
}

pub struct Forecast {
    pub time: String,
    pub target: String,
    pub config: ForecastConfig,
}

impl Forecast {
    pub fn new(time: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            target: target.into(),
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ForecastConfig) -> Self {
        self.config = config;
        self
    }

    /// Target values in time order, missing values dropped.
    fn series(&self, input: &Frame) -> Result<Vec<f64>, OpError> {
        let time = input
            .column(&self.time)
            .ok_or_else(|| OpError::column_not_found(&self.time, input))?;
        let target = numeric_column(input, &self.target)?;

        let mut order: Vec<usize> = (0..input.num_rows()).collect();
        order.sort_by(|&a, &b| sort_cmp(&time.values[a], &time.values[b]));

        Ok(order
            .into_iter()
            .filter_map(|i| target.values[i].as_f64())
            .filter(|v| !v.is_nan())
            .collect())
    }
}

impl Operator for Forecast {
    fn name(&self) -> &'static str {
        "forecast"
    }

    fn eval(&self, input: &Frame) -> Result<ResultPayload, OpError> {
        let series = self.series(input)?;
        let Some(&last_actual) = series.last() else {
            return Err(OpError::InsufficientData(format!(
                "'{}' has no observations to forecast from",
                self.target
            )));
        };

        let window = self.config.window.max(1).min(series.len());
        let training = &series[series.len() - window..];
        let horizon = self.config.horizon;

        let fitted = HoltWinters::fit(training, self.config.season_length).and_then(|model| {
            let values = model.predict(horizon);
            values
                .iter()
                .all(|v| v.is_finite())
                .then_some((model.params, values))
        });

        let (method, parameters, forecast_values) = match fitted {
            Some((params, values)) => (ForecastMethod::HoltWinters, Some(params), values),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    points = training.len(),
                    season_length = self.config.season_length,
                    "holt-winters unavailable, using simple average"
                );
                (
                    ForecastMethod::SimpleAverage,
                    None,
                    vec![mean(training); horizon],
                )
            }
        };

        Ok(ResultPayload::Forecast(ForecastResult {
            forecast_values,
            last_actual,
            target_column: self.target.clone(),
            method,
            training_points: training.len(),
            parameters,
        }))
    }
}
