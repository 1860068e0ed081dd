use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("source is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("unsupported source format: {0} (only .csv files are accepted)")]
    UnsupportedFormat(String),

    #[error("empty source: {0}")]
    Empty(&'static str),
}

impl From<plansight_core::error::Error> for Error {
    fn from(e: plansight_core::error::Error) -> Self {
        Error::Schema(e.to_string())
    }
}
