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

//! Reading a dataset back.

use crate::error::{CsvError, Result};
use perfsweep_core::{Metric, COLUMNS};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of a dataset file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetRecord {
    /// Benchmark program name.
    pub workload: String,
    /// Input size label, e.g. `simlarge`.
    pub size: String,
    /// Numeric argument the size label maps to for this workload.
    #[serde(rename = "size-param")]
    pub size_param: u64,
    /// Thread count the configuration ran with.
    pub threads: u32,
    /// Mean retired branch instructions per trial.
    #[serde(rename = "branch-instructions")]
    pub branch_instructions: f64,
    /// Mean mispredicted branches per trial.
    #[serde(rename = "branch-misses")]
    pub branch_misses: f64,
    /// Mean cache misses per trial.
    #[serde(rename = "cache-misses")]
    pub cache_misses: f64,
    /// Mean cache references per trial.
    #[serde(rename = "cache-references")]
    pub cache_references: f64,
    /// Mean CPU cycles per trial.
    pub cycles: f64,
    /// Mean retired instructions per trial.
    pub instructions: f64,
    /// Mean task clock per trial, in milliseconds.
    #[serde(rename = "cpu-clock")]
    pub cpu_clock: f64,
    /// Mean page faults per trial.
    #[serde(rename = "page-faults")]
    pub page_faults: f64,
    /// Mean L1 data cache loads per trial.
    #[serde(rename = "L1-dcache-loads")]
    pub l1_dcache_loads: f64,
    /// Mean L1 instruction cache load misses per trial.
    #[serde(rename = "L1-icache-load-misses")]
    pub l1_icache_load_misses: f64,
    /// Mean last-level cache load misses per trial.
    #[serde(rename = "LLC-load-misses")]
    pub llc_load_misses: f64,
    /// Mean instructions per cycle.
    pub ipc: f64,
    /// Mean cache misses as a percentage of cache references.
    #[serde(rename = "cache-miss-rate")]
    pub cache_miss_rate: f64,
    /// Mean mispredicted branches as a percentage of all branches.
    #[serde(rename = "branch-miss-rate")]
    pub branch_miss_rate: f64,
    /// Mean wall-clock seconds per trial.
    #[serde(rename = "run-time")]
    pub run_time: f64,
    /// Mean wall-clock seconds of the single-thread run at this size.
    #[serde(rename = "baseline-time")]
    pub baseline_time: f64,
    /// `baseline_time / run_time`.
    pub speedup: f64,
}

impl DatasetRecord {
    /// The averaged value of a metric column.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::BranchInstructions => self.branch_instructions,
            Metric::BranchMisses => self.branch_misses,
            Metric::CacheMisses => self.cache_misses,
            Metric::CacheReferences => self.cache_references,
            Metric::Cycles => self.cycles,
            Metric::Instructions => self.instructions,
            Metric::CpuClock => self.cpu_clock,
            Metric::PageFaults => self.page_faults,
            Metric::L1DcacheLoads => self.l1_dcache_loads,
            Metric::L1IcacheLoadMisses => self.l1_icache_load_misses,
            Metric::LlcLoadMisses => self.llc_load_misses,
            Metric::Ipc => self.ipc,
            Metric::CacheMissRate => self.cache_miss_rate,
            Metric::BranchMissRate => self.branch_miss_rate,
            Metric::RunTime => self.run_time,
        }
    }
}

/// Reads every row of a dataset file.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Vec<DatasetRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CsvError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    read_dataset_from(file)
}

/// Reads every row of a dataset from any reader.
///
/// # Errors
///
/// [`CsvError::HeaderMismatch`] if the header is not exactly the dataset
/// columns, or a CSV error for a malformed row.
pub fn read_dataset_from<R: Read>(reader: R) -> Result<Vec<DatasetRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for (position, expected) in COLUMNS.iter().enumerate() {
        let found = headers.get(position).unwrap_or("");
        if found != *expected {
            return Err(CsvError::HeaderMismatch {
                position,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }
    if let Some(extra) = headers.get(COLUMNS.len()) {
        return Err(CsvError::HeaderMismatch {
            position: COLUMNS.len(),
            expected: String::new(),
            found: extra.to_string(),
        });
    }

    reader
        .deserialize()
        .map(|record| record.map_err(CsvError::from))
        .collect()
}
