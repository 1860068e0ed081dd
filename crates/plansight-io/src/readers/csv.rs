//! CSV reader → `Frame`.
//!
//! Reads the whole source in one pass, then infers a `DataType` per column
//! and parses every cell into a typed `Scalar`. A header row is required and
//! every record must have the header's field count.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv as csv_crate;
use plansight_core::types::{Column, Frame};

use crate::error::{Error, Result};
use crate::readers::infer::{infer_type, parse_cell};

pub struct CsvReader<R: Read> {
    rdr: csv_crate::Reader<R>,
}

impl CsvReader<File> {
    pub fn from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, delimiter))
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Self {
        let rdr = csv_crate::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .delimiter(delimiter)
            .from_reader(reader);
        Self { rdr }
    }

    /// Consume the source and build a frame. No partial frame is returned on
    /// error.
    pub fn read_frame(mut self) -> Result<Frame> {
        let headers: Vec<String> = self.rdr.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::Empty("no header row"));
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for rec in self.rdr.records() {
            let rec = rec?;
            for (i, cells) in raw.iter_mut().enumerate() {
                cells.push(rec.get(i).unwrap_or_default().to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| {
                let data_type = infer_type(&cells);
                let values = cells.iter().map(|c| parse_cell(c, data_type)).collect();
                Column::new(name, data_type, values)
            })
            .collect();

        Ok(Frame::new(columns)?)
    }
}
