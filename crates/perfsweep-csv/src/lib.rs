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

//! CSV dataset output for PerfSweep.
//!
//! A sweep produces one dataset: a header line followed by one row per
//! finalized configuration, in visit order. [`DatasetWriter`] appends and
//! flushes each row as it arrives, so a sweep that aborts midway still
//! leaves every completed row on disk.
//!
//! # Features
//!
//! - **Append-only writes**: header once, then rows, each flushed immediately
//! - **Row sink**: [`DatasetWriter`] plugs straight into a sweep controller
//! - **Read back**: [`read_dataset`] validates the header and deserializes rows
//!
//! # Examples
//!
//! ```no_run
//! use perfsweep_core::{preset, run_sweep};
//! use perfsweep_csv::{read_dataset, DatasetWriter};
//! # use perfsweep_core::{BenchmarkSuite, Configuration, ExternalError, TrialOutput, Workload};
//! # struct Suite;
//! # impl BenchmarkSuite for Suite {
//! #     fn build(&mut self, _: &Workload) -> Result<(), ExternalError> { Ok(()) }
//! #     fn run(&mut self, _: &Configuration) -> Result<TrialOutput, ExternalError> { unimplemented!() }
//! #     fn uninstall(&mut self, _: &Workload) -> Result<(), ExternalError> { Ok(()) }
//! # }
//!
//! let plan = preset("splash").unwrap().config().validate().unwrap();
//! let writer = DatasetWriter::create("results.csv").unwrap();
//! run_sweep(&plan, Suite, writer).unwrap();
//!
//! for record in read_dataset("results.csv").unwrap() {
//!     println!("{} x{}: {}", record.workload, record.threads, record.speedup);
//! }
//! ```

mod error;
mod reader;
mod writer;

pub use error::{CsvError, Result};
pub use reader::{read_dataset, read_dataset_from, DatasetRecord};
pub use writer::DatasetWriter;
