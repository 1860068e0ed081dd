//! Scalar values, typed columns and the in-memory `Frame`.
//!
//! `Frame` is the columnar representation of one loaded dataset. It is never
//! mutated in place: filters and sorts produce derived frames via `take`.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

/// Tagged scalar. One variant per `DataType` family plus `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Temporal(NaiveDateTime),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(DataType::Boolean),
            Scalar::Number(_) => Some(DataType::Numeric),
            Scalar::Text(_) => Some(DataType::Text),
            Scalar::Temporal(_) => Some(DataType::Temporal),
        }
    }

    /// Convert an untyped JSON literal. Arrays and objects have no scalar form.
    pub fn from_json(value: &Value) -> Option<Scalar> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Scalar::Number),
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(v) => number_to_json(*v),
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Temporal(t) => Value::String(format_temporal(t)),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(v) => f.write_str(&render_number(*v)),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Temporal(t) => f.write_str(&format_temporal(t)),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Integral values print without a fractional part ("2023", not "2023.0").
pub fn render_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn number_to_json(v: f64) -> Value {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Value::from(v as i64)
    } else {
        Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse the date/datetime spellings the loader recognises as temporal.
pub fn parse_temporal(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

pub fn format_temporal(t: &NaiveDateTime) -> String {
    if t.hour() == 0 && t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0 {
        t.format("%Y-%m-%d").to_string()
    } else {
        t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    pub fn field(&self) -> Field {
        Field::new(self.name.clone(), self.data_type, self.null_count() > 0)
    }
}

/// Ordered, uniquely-named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Schema(format!("duplicate column '{}'", col.name)));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for col in &columns {
                if col.len() != expected {
                    return Err(Error::Schema(format!(
                        "column '{}' has length {} but expected {}",
                        col.name,
                        col.len(),
                        expected
                    )));
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(Column::field).collect())
    }

    /// Derive a frame holding the given rows, in the given order.
    ///
    /// Indices must be in bounds; callers obtain them from this frame.
    pub fn take(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data_type: c.data_type,
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Frame { columns }
    }

    /// One row as a column-ordered JSON object.
    pub fn row_map(&self, idx: usize) -> Map<String, Value> {
        let mut row = Map::new();
        for col in &self.columns {
            let v = col.values.get(idx).map(Scalar::to_json).unwrap_or(Value::Null);
            row.insert(col.name.clone(), v);
        }
        row
    }

    pub fn head(&self, n: usize) -> Vec<Map<String, Value>> {
        (0..self.num_rows().min(n)).map(|i| self.row_map(i)).collect()
    }
}
