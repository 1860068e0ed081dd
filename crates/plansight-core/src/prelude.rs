//! Convenience re-exports for downstream crates.

pub use crate::compare::CmpOp;
pub use crate::config::{EngineConfig, ForecastConfig};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::hash::{hash_json, Hash256};
pub use crate::id::SessionId;
pub use crate::ops::Operation;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, Frame, Scalar};
