//! Engine configuration with environment overrides.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;

/// Forecast window/horizon/seasonality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Most recent observations used for fitting.
    pub window: usize,
    /// Steps forecast beyond the observed series.
    pub horizon: usize,
    /// Seasonal period of the Holt-Winters model.
    pub season_length: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: 12,
            horizon: 3,
            season_length: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rows included in a dataset preview.
    pub preview_rows: usize,
    /// Sources larger than this are rejected before parsing.
    pub max_source_bytes: u64,
    /// Field delimiter of delimited sources.
    pub delimiter: u8,
    pub forecast: ForecastConfig,
    /// When false, `chart_type` is ignored and no renderer runs.
    pub charts_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            delimiter: b',',
            forecast: ForecastConfig::default(),
            charts_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `PLANSIGHT_*` environment variables.
    ///
    /// Unparseable values leave the default in place; call `validate` to
    /// reject nonsensical combinations.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        override_from_env("PLANSIGHT_PREVIEW_ROWS", &mut cfg.preview_rows);
        override_from_env("PLANSIGHT_MAX_SOURCE_BYTES", &mut cfg.max_source_bytes);
        override_from_env("PLANSIGHT_FORECAST_WINDOW", &mut cfg.forecast.window);
        override_from_env("PLANSIGHT_FORECAST_HORIZON", &mut cfg.forecast.horizon);
        override_from_env(
            "PLANSIGHT_FORECAST_SEASON_LENGTH",
            &mut cfg.forecast.season_length,
        );
        override_from_env("PLANSIGHT_CHARTS", &mut cfg.charts_enabled);
        if let Ok(raw) = env::var("PLANSIGHT_DELIMITER") {
            if let [b] = raw.as_bytes() {
                cfg.delimiter = *b;
            }
        }
        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.preview_rows == 0 {
            return Err(Error::Config("preview_rows must be positive".into()));
        }
        if self.max_source_bytes == 0 {
            return Err(Error::Config("max_source_bytes must be positive".into()));
        }
        let f = &self.forecast;
        if f.window == 0 || f.horizon == 0 || f.season_length == 0 {
            return Err(Error::Config(format!(
                "forecast window ({}), horizon ({}) and season_length ({}) must be positive",
                f.window, f.horizon, f.season_length
            )));
        }
        Ok(())
    }
}

fn override_from_env<T: FromStr>(key: &str, slot: &mut T) {
    if let Some(v) = env::var(key).ok().and_then(|raw| raw.trim().parse().ok()) {
        *slot = v;
    }
}
