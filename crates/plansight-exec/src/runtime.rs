//! Runtime: validate a plan, filter the loaded frame, dispatch one operation.
//!
//! Each call walks `validate → filter → dispatch → chart` once:
//! - a rejected plan never reaches the data;
//! - an empty filter result is reported apart from malformed plans;
//! - charting is best effort and cannot turn success into failure.
//!
//! The loaded frame is held behind an `Arc` and replaced wholesale by the
//! next load, after that load has fully parsed.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use plansight_core::config::EngineConfig;
use plansight_core::error::ErrorKind;
use plansight_core::hash::{hash_json, Hash256};
use plansight_core::ops::Operation;
use plansight_core::types::Frame;

use plansight_io::error::Error as LoadError;
use plansight_io::{DatasetSummary, LoadedDataset};

use plansight_operators::{apply_filters, OpError, OpParams, Predicate, Registry, ResultPayload};

use plansight_planner::{validate, ExecutionPlan, PlanError, Verdict};

use crate::chart::{BestEffort, Chart, ChartRenderer, SvgRenderer};
use crate::result::{ExecutionResult, Progress};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Plan validation failed: {}", .0.errors.join("; "))]
    Rejected(Verdict),

    #[error("Plan requires clarification: {0}")]
    ClarificationRequired(String),

    #[error("No data matches the specified filters")]
    EmptyResult,

    #[error(transparent)]
    Operator(#[from] OpError),

    #[error("No data loaded")]
    NoDataLoaded,

    #[error("failed to load dataset: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl ExecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::Rejected(_) | ExecError::Plan(_) => ErrorKind::Validation,
            ExecError::ClarificationRequired(_) => ErrorKind::Clarification,
            ExecError::EmptyResult | ExecError::Load(_) => ErrorKind::Data,
            ExecError::Operator(e) => e.kind(),
            ExecError::NoDataLoaded => ErrorKind::State,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ExecError::Operator(e) => e.suggestions(),
            ExecError::EmptyResult => vec!["Relax or remove some filters".into()],
            ExecError::NoDataLoaded => vec!["Load a dataset before executing a plan".into()],
            ExecError::Load(LoadError::TooLarge { .. }) => {
                vec!["Split the dataset or raise PLANSIGHT_MAX_SOURCE_BYTES".into()]
            }
            ExecError::Load(LoadError::UnsupportedFormat(_)) => {
                vec!["Save the dataset as a .csv file".into()]
            }
            _ => vec![],
        }
    }
}

/// A successful execution before it is shaped into an `ExecutionResult`.
#[derive(Debug, Clone)]
pub struct Completed {
    pub operation: Operation,
    pub payload: ResultPayload,
    pub chart: Option<Chart>,
    pub filtered_row_count: usize,
    pub warnings: Vec<String>,
    pub plan_hash: Option<Hash256>,
}

/// Engine owns the loaded frame, the operator registry, and the renderer.
pub struct Engine {
    cfg: EngineConfig,
    registry: Registry,
    renderer: Option<BestEffort<Box<dyn ChartRenderer>>>,
    frame: Option<Arc<Frame>>,
    summary: Option<DatasetSummary>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        let renderer = if cfg.charts_enabled {
            let svg: Box<dyn ChartRenderer> = Box::new(SvgRenderer);
            Some(BestEffort::new(svg))
        } else {
            None
        };
        Self {
            cfg,
            registry: Registry::new(),
            renderer,
            frame: None,
            summary: None,
        }
    }

    /// Replace the chart renderer. Ignored while charts are disabled.
    pub fn with_renderer(mut self, renderer: impl ChartRenderer + 'static) -> Self {
        if self.cfg.charts_enabled {
            let boxed: Box<dyn ChartRenderer> = Box::new(renderer);
            self.renderer = Some(BestEffort::new(boxed));
        }
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn is_loaded(&self) -> bool {
        self.frame.is_some()
    }

    /// Shared handle to the loaded frame.
    pub fn frame(&self) -> Option<Arc<Frame>> {
        self.frame.clone()
    }

    pub fn summary(&self) -> Option<&DatasetSummary> {
        self.summary.as_ref()
    }

    /// Load a `.csv` file. On failure the previously loaded frame stays.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<DatasetSummary, ExecError> {
        let loaded = plansight_io::load_path(path, &self.cfg)?;
        Ok(self.install(loaded))
    }

    /// Load CSV text. On failure the previously loaded frame stays.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<DatasetSummary, ExecError> {
        let loaded = plansight_io::load_bytes(bytes, &self.cfg)?;
        Ok(self.install(loaded))
    }

    /// Install an already-built frame.
    pub fn load_frame(&mut self, frame: Frame) -> DatasetSummary {
        let summary = DatasetSummary::from_frame(&frame, self.cfg.preview_rows);
        self.install(LoadedDataset { frame, summary })
    }

    fn install(&mut self, loaded: LoadedDataset) -> DatasetSummary {
        self.frame = Some(Arc::new(loaded.frame));
        self.summary = Some(loaded.summary.clone());
        loaded.summary
    }

    pub fn validate(&self, plan: &Value) -> Verdict {
        validate(plan)
    }

    /// Execute and fold every outcome into an `ExecutionResult`.
    pub fn execute(&self, plan: &Value) -> ExecutionResult {
        let mut progress = Progress::default();
        match self.run(plan, &mut progress) {
            Ok(done) => ExecutionResult::completed(done),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, kind = ?err.kind(), "execution failed");
                ExecutionResult::failed(err, progress)
            }
        }
    }

    pub fn try_execute(&self, plan: &Value) -> Result<Completed, ExecError> {
        self.run(plan, &mut Progress::default())
    }

    fn run(&self, plan_value: &Value, progress: &mut Progress) -> Result<Completed, ExecError> {
        progress.operation = plan_value
            .get("operation")
            .and_then(Value::as_str)
            .and_then(Operation::parse);
        progress.plan_hash = hash_json(plan_value).ok();

        let verdict = validate(plan_value);
        if !verdict.valid {
            return Err(ExecError::Rejected(verdict));
        }
        progress.warnings = verdict.warnings;

        let plan = ExecutionPlan::from_value(plan_value)?;
        if plan.requires_clarification {
            let question = plan.clarification_question.clone().unwrap_or_default();
            return Err(ExecError::ClarificationRequired(question));
        }

        let frame = self.frame.clone().ok_or(ExecError::NoDataLoaded)?;

        let predicates: Vec<Predicate> = plan
            .filters
            .iter()
            .map(|f| Predicate::new(f.column.clone(), f.operator, f.value.clone()))
            .collect();
        let filtered = apply_filters(&frame, &predicates)?;
        progress.filtered_row_count = filtered.num_rows();
        if filtered.is_empty() {
            return Err(ExecError::EmptyResult);
        }

        let params = OpParams {
            target_column: plan.target_column.clone(),
            group_by: plan.group_by.clone(),
            x_axis: plan.x_axis.clone(),
            y_axis: plan.y_axis.clone(),
            time_column: plan.time_column.clone(),
            forecast: self.cfg.forecast.clone(),
        };
        let payload = self.registry.dispatch(plan.operation, &params, &filtered)?;

        let chart = match (&self.renderer, plan.chart_type) {
            (Some(renderer), Some(_)) => renderer.render(&filtered, &plan),
            _ => None,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %plan.operation,
            rows = filtered.num_rows(),
            chart = chart.is_some(),
            "execution completed"
        );

        Ok(Completed {
            operation: plan.operation,
            payload,
            chart,
            filtered_row_count: filtered.num_rows(),
            warnings: std::mem::take(&mut progress.warnings),
            plan_hash: progress.plan_hash,
        })
    }
}
