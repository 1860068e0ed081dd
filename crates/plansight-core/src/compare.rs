//! Comparison operators and literal coercion for filter predicates.
//!
//! A predicate is `column OP literal` where OP ∈ {==, !=, >, <, >=, <=}.
//! Literals arrive untyped and are coerced to the column's `DataType` at
//! filter-application time; a literal with no unambiguous reading in the
//! column's family does not coerce.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::DataType;
use crate::types::{parse_temporal, render_number, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CmpOp {
    pub const ALL: [CmpOp; 6] = [
        CmpOp::Eq,
        CmpOp::Ne,
        CmpOp::Gt,
        CmpOp::Lt,
        CmpOp::Ge,
        CmpOp::Le,
    ];

    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "==" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            ">" => Some(CmpOp::Gt),
            "<" => Some(CmpOp::Lt),
            ">=" => Some(CmpOp::Ge),
            "<=" => Some(CmpOp::Le),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
        }
    }

    /// True for the four ordering operators.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, CmpOp::Eq | CmpOp::Ne)
    }

    pub fn holds(&self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord.is_eq(),
            CmpOp::Ne => ord.is_ne(),
            CmpOp::Gt => ord.is_gt(),
            CmpOp::Lt => ord.is_lt(),
            CmpOp::Ge => ord.is_ge(),
            CmpOp::Le => ord.is_le(),
        }
    }

    /// Evaluate `cell OP literal`. Both sides must already share a family.
    ///
    /// Null cells only satisfy `!=` against a non-null literal; a null literal
    /// supports `==`/`!=` as "is null"/"is not null".
    pub fn matches(&self, cell: &Scalar, literal: &Scalar) -> bool {
        match (cell.is_null(), literal.is_null()) {
            (_, true) => match self {
                CmpOp::Eq => cell.is_null(),
                CmpOp::Ne => !cell.is_null(),
                _ => false,
            },
            (true, false) => matches!(self, CmpOp::Ne),
            (false, false) => match scalar_cmp(cell, literal) {
                Some(ord) => self.holds(ord),
                None => matches!(self, CmpOp::Ne),
            },
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CmpOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CmpOp::parse(s).ok_or_else(|| format!("unknown comparison operator: {}", s))
    }
}

impl Serialize for CmpOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for CmpOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compare two scalars of the same family. Mixed families and NaN are
/// incomparable (`None`).
pub fn scalar_cmp(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    use Scalar::*;
    match (a, b) {
        (Null, Null) => Some(Ordering::Equal),
        (Bool(x), Bool(y)) => Some(x.cmp(y)),
        (Number(x), Number(y)) => x.partial_cmp(y),
        (Text(x), Text(y)) => Some(x.cmp(y)),
        (Temporal(x), Temporal(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order used for sorting a column: same-family values by value,
/// nulls (and NaN) after everything else.
pub fn sort_cmp(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => scalar_cmp(a, b).unwrap_or_else(|| {
            let a_nan = a.as_f64().map(f64::is_nan).unwrap_or(false);
            let b_nan = b.as_f64().map(f64::is_nan).unwrap_or(false);
            a_nan.cmp(&b_nan)
        }),
    }
}

/// Coerce an untyped literal into `target`'s family.
///
/// Returns `None` when the literal has no unambiguous reading in that family,
/// e.g. a number against a temporal column.
pub fn coerce_literal(literal: &Scalar, target: DataType) -> Option<Scalar> {
    use Scalar::*;
    match (target, literal) {
        (_, Null) => Some(Null),

        (DataType::Numeric, Number(v)) => Some(Number(*v)),
        (DataType::Numeric, Text(s)) => s.trim().parse::<f64>().ok().map(Number),
        (DataType::Numeric, _) => None,

        (DataType::Text, Text(s)) => Some(Text(s.clone())),
        (DataType::Text, Number(v)) => Some(Text(render_number(*v))),
        (DataType::Text, Bool(b)) => Some(Text(b.to_string())),
        (DataType::Text, Temporal(_)) => Some(Text(literal.to_string())),

        (DataType::Temporal, Temporal(t)) => Some(Temporal(*t)),
        (DataType::Temporal, Text(s)) => parse_temporal(s).map(Temporal),
        (DataType::Temporal, _) => None,

        (DataType::Boolean, Bool(b)) => Some(Bool(*b)),
        (DataType::Boolean, Text(s)) => parse_bool(s).map(Bool),
        (DataType::Boolean, _) => None,
    }
}

/// `true`/`false`, case-insensitive.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
