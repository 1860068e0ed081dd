//! Operator registry for exec wiring.
//!
//! Maps each `Operation` to a maker that builds a configured operator from
//! the plan parameters. Dispatch over the closed operation set lives here
//! and nowhere else.

use std::collections::HashMap;

use plansight_core::config::ForecastConfig;
use plansight_core::ops::Operation;
use plansight_core::types::Frame;

use crate::aggregate::{AggFunc, Aggregate};
use crate::correlation::Correlation;
use crate::forecast::Forecast;
use crate::payload::ResultPayload;
use crate::regression::Regression;
use crate::traits::{OpError, Operator};

/// Plan parameters an operator may read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpParams {
    pub target_column: Option<String>,
    pub group_by: Vec<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub time_column: Option<String>,
    pub forecast: ForecastConfig,
}

impl OpParams {
    /// A required column parameter, named by its plan field.
    pub fn require<'a>(
        &self,
        op: Operation,
        field: &'static str,
        value: &'a Option<String>,
    ) -> Result<&'a str, OpError> {
        value
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| OpError::MissingParameter(format!("'{}' requires {}", op, field)))
    }
}

pub type Maker = fn(Operation, &OpParams) -> Result<Box<dyn Operator>, OpError>;

pub struct Registry {
    makers: HashMap<Operation, Maker>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry with every built-in operation.
    pub fn new() -> Self {
        let mut r = Self::empty();
        for op in Operation::ALL {
            if op.is_aggregation() {
                r.register(op, make_aggregate);
            }
        }
        r.register(Operation::Correlation, make_correlation);
        r.register(Operation::Regression, make_regression);
        r.register(Operation::Forecast, make_forecast);
        r
    }

    pub fn empty() -> Self {
        Self {
            makers: HashMap::new(),
        }
    }

    pub fn register(&mut self, op: Operation, maker: Maker) {
        self.makers.insert(op, maker);
    }

    pub fn make(&self, op: Operation, params: &OpParams) -> Result<Box<dyn Operator>, OpError> {
        let maker = self
            .makers
            .get(&op)
            .ok_or_else(|| OpError::UnknownOperation(op.to_string()))?;
        maker(op, params)
    }

    /// Build the operator for `op` and evaluate it once over `input`.
    pub fn dispatch(
        &self,
        op: Operation,
        params: &OpParams,
        input: &Frame,
    ) -> Result<ResultPayload, OpError> {
        let operator = self.make(op, params)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(operator = operator.name(), rows = input.num_rows(), "dispatch");
        operator.eval(input)
    }
}

fn make_aggregate(op: Operation, params: &OpParams) -> Result<Box<dyn Operator>, OpError> {
    let func = AggFunc::from_operation(op).ok_or_else(|| OpError::UnknownOperation(op.to_string()))?;
    Ok(Box::new(Aggregate {
        func,
        target: params.target_column.clone().filter(|s| !s.trim().is_empty()),
        group_by: params.group_by.clone(),
    }))
}

fn make_correlation(op: Operation, params: &OpParams) -> Result<Box<dyn Operator>, OpError> {
    let x = params.require(op, "x_axis", &params.x_axis)?;
    let y = params.require(op, "y_axis", &params.y_axis)?;
    Ok(Box::new(Correlation::new(x, y)))
}

fn make_regression(op: Operation, params: &OpParams) -> Result<Box<dyn Operator>, OpError> {
    let x = params.require(op, "x_axis", &params.x_axis)?;
    let y = params.require(op, "y_axis", &params.y_axis)?;
    Ok(Box::new(Regression::new(x, y)))
}

fn make_forecast(op: Operation, params: &OpParams) -> Result<Box<dyn Operator>, OpError> {
    let time = params.require(op, "time_column", &params.time_column)?;
    let target = params.require(op, "target_column", &params.target_column)?;
    Ok(Box::new(
        Forecast::new(time, target).with_config(params.forecast.clone()),
    ))
}
