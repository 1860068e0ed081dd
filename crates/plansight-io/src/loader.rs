//! Entry points for the `load` contract.

use std::fs;
use std::io::Read;
use std::path::Path;

use plansight_core::config::EngineConfig;
use plansight_core::types::Frame;

use crate::error::{Error, Result};
use crate::readers::csv::CsvReader;
use crate::summary::DatasetSummary;

/// A fully parsed frame plus the summary handed back to callers.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub frame: Frame,
    pub summary: DatasetSummary,
}

impl LoadedDataset {
    fn new(frame: Frame, cfg: &EngineConfig) -> Self {
        let summary = DatasetSummary::from_frame(&frame, cfg.preview_rows);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = summary.row_count,
            columns = summary.columns.len(),
            "loaded dataset"
        );
        Self { frame, summary }
    }
}

/// Load a `.csv` file, enforcing `max_source_bytes` before parsing.
pub fn load_path(path: impl AsRef<Path>, cfg: &EngineConfig) -> Result<LoadedDataset> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(Error::UnsupportedFormat(path.display().to_string()));
    }

    let size = fs::metadata(path)?.len();
    if size > cfg.max_source_bytes {
        return Err(Error::TooLarge {
            size,
            limit: cfg.max_source_bytes,
        });
    }

    let frame = CsvReader::from_path(path, cfg.delimiter)?.read_frame()?;
    Ok(LoadedDataset::new(frame, cfg))
}

/// Load CSV text already held in memory.
pub fn load_bytes(bytes: &[u8], cfg: &EngineConfig) -> Result<LoadedDataset> {
    let size = bytes.len() as u64;
    if size > cfg.max_source_bytes {
        return Err(Error::TooLarge {
            size,
            limit: cfg.max_source_bytes,
        });
    }
    load_reader(bytes, cfg)
}

/// Load from an arbitrary reader. No size guard is applied.
pub fn load_reader<R: Read>(reader: R, cfg: &EngineConfig) -> Result<LoadedDataset> {
    let frame = CsvReader::from_reader(reader, cfg.delimiter).read_frame()?;
    Ok(LoadedDataset::new(frame, cfg))
}
