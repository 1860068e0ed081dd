use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Hashing error: {0}")]
    Hash(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use plansight_core::error::Error;
    /// let err = Error::Schema("duplicate column 'region'".into());
    /// let err = err.with_context("while loading sales.csv");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Schema(msg) => {
                if msg.contains("duplicate column") {
                    vec!["Rename one of the duplicated header cells".into()]
                } else if msg.contains("length") {
                    vec!["Check that every row has the same number of fields".into()]
                } else {
                    vec![]
                }
            }
            Error::Config(msg) => {
                if msg.contains("forecast") {
                    vec!["Forecast window, horizon and season length must be positive".into()]
                } else {
                    vec!["Check the PLANSIGHT_* environment variables".into()]
                }
            }
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}

/// Failure taxonomy shared by every layer above core.
///
/// `Validation`, `Data` and `Computation` failures are recoverable by
/// resubmitting a changed plan or dataset; `Chart` failures never escape the
/// renderer boundary; `State` failures are caller sequencing bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Clarification,
    Data,
    Computation,
    Chart,
    State,
}
