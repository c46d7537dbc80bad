// Dweve PerfSweep - Parallel Scaling Measurement Sweeps
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Append-only dataset writer.

use crate::error::{CsvError, Result};
use perfsweep_core::{OutputRow, RowSink, COLUMNS};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the sweep dataset: the header once, then one row per
/// finalized configuration.
///
/// Every row is flushed as soon as it is written, so rows survive a sweep
/// that aborts later. There is no way to rewrite or remove a row.
///
/// # Example
///
/// ```no_run
/// use perfsweep_csv::DatasetWriter;
///
/// let writer = DatasetWriter::create("results.csv").unwrap();
/// assert_eq!(writer.rows_written(), 0);
/// ```
pub struct DatasetWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl DatasetWriter<File> {
    /// Creates (or truncates) the dataset file and writes the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| CsvError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_writer(file)
    }
}

impl<W: Write> DatasetWriter<W> {
    /// Wraps a writer and writes the header to it.
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one row and flushes it.
    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.writer.write_record(row.record())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| CsvError::Io(e.into_error()))
    }
}

impl<W: Write> RowSink for DatasetWriter<W> {
    type Error = CsvError;

    fn write_row(&mut self, row: &OutputRow) -> std::result::Result<(), Self::Error> {
        DatasetWriter::write_row(self, row)
    }
}
