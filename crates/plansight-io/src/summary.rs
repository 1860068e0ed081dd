//! Metadata returned to the caller after a successful load.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use plansight_core::schema::DataType;
use plansight_core::types::Frame;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Column names in source order.
    pub columns: Vec<String>,
    pub column_types: BTreeMap<String, DataType>,
    pub row_count: usize,
    /// First rows as column-ordered maps.
    pub preview: Vec<Map<String, Value>>,
}

impl DatasetSummary {
    pub fn from_frame(frame: &Frame, preview_rows: usize) -> Self {
        Self {
            columns: frame.column_names(),
            column_types: frame
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.data_type))
                .collect(),
            row_count: frame.num_rows(),
            preview: frame.head(preview_rows),
        }
    }
}
