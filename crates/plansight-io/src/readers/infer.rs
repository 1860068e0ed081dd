//! Per-column type inference over raw cell text.
//!
//! Inference looks only at present cells and picks the first family every
//! cell parses as: boolean, numeric, temporal, then text. Empty cells and the
//! [`NA_TOKENS`] spellings are missing values in every column type.

use plansight_core::compare::parse_bool;
use plansight_core::schema::DataType;
use plansight_core::types::{parse_temporal, Scalar};

/// Cell spellings read as missing, matched exactly after trimming.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

pub fn infer_type(cells: &[String]) -> DataType {
    let present: Vec<&str> = cells
        .iter()
        .filter(|c| !is_missing(c))
        .map(|c| c.trim())
        .collect();

    if present.is_empty() {
        return DataType::Text;
    }
    if present.iter().all(|c| parse_bool(c).is_some()) {
        return DataType::Boolean;
    }
    if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        return DataType::Numeric;
    }
    if present.iter().all(|c| parse_temporal(c).is_some()) {
        return DataType::Temporal;
    }
    DataType::Text
}

/// Parse one cell as `data_type`. Missing cells are `Null`.
pub fn parse_cell(raw: &str, data_type: DataType) -> Scalar {
    if is_missing(raw) {
        return Scalar::Null;
    }
    let trimmed = raw.trim();
    match data_type {
        DataType::Boolean => parse_bool(trimmed).map(Scalar::Bool).unwrap_or(Scalar::Null),
        DataType::Numeric => trimmed
            .parse::<f64>()
            .map(Scalar::Number)
            .unwrap_or(Scalar::Null),
        DataType::Temporal => parse_temporal(trimmed)
            .map(Scalar::Temporal)
            .unwrap_or(Scalar::Null),
        DataType::Text => Scalar::Text(raw.to_string()),
    }
}
