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

//! PerfSweep core: measurement sweeps and counter aggregation.
//!
//! Sweeps a benchmark suite over workloads, problem sizes and thread counts,
//! runs every configuration several times under a hardware-counter
//! profiler, averages the counters, and derives parallel speedup against
//! the single-thread run of the same (workload, size) group.
//!
//! ## Pipeline
//!
//! ```text
//! SweepController ──run──▶ BenchmarkSuite ──▶ TrialOutput
//!        │                                      │
//!        │            parse_timing_report ◀─────┤
//!        │            parse_counter_report ◀────┘
//!        ▼
//! MetricAccumulator ──finalize──▶ MetricAverages ──▶ OutputRow ──▶ RowSink
//! ```
//!
//! Process spawning and file writing live in other crates; this one only
//! defines the [`BenchmarkSuite`] and [`RowSink`] seams.
//!
//! ## Example
//!
//! ```
//! use perfsweep_core::{
//!     run_sweep, BenchmarkSuite, Configuration, ExternalError, OutputRow, SweepConfig,
//!     TrialOutput, Workload,
//! };
//!
//! struct Canned;
//!
//! impl BenchmarkSuite for Canned {
//!     fn build(&mut self, _: &Workload) -> Result<(), ExternalError> {
//!         Ok(())
//!     }
//!
//!     fn run(&mut self, c: &Configuration) -> Result<TrialOutput, ExternalError> {
//!         let secs = 8.0 / c.threads as f64;
//!         Ok(TrialOutput::new(
//!             format!("real\t0m{secs}s\n"),
//!             "# started\n\n1000,,cycles:u,1,100.00,,\n",
//!         ))
//!     }
//!
//!     fn uninstall(&mut self, _: &Workload) -> Result<(), ExternalError> {
//!         Ok(())
//!     }
//! }
//!
//! let plan = SweepConfig::new(["small"], vec![Workload::new("fft").with_param("small", 20)])
//!     .with_threads(&[1, 2, 4])
//!     .with_trials(2)
//!     .validate()
//!     .unwrap();
//!
//! let mut rows: Vec<OutputRow> = Vec::new();
//! run_sweep(&plan, Canned, &mut rows).unwrap();
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[2].speedup, 4.0);
//! ```

pub mod accumulator;
pub mod config;
pub mod counters;
pub mod error;
pub mod metrics;
pub mod presets;
pub mod row;
pub mod sweep;
pub mod timing;

pub use accumulator::{MetricAccumulator, MetricAverages, TrialResult};
pub use config::{
    Configuration, FailurePolicy, SuiteCommands, SweepConfig, SweepPlan, TimingSource, Workload,
    DEFAULT_THREADS, DEFAULT_TRIALS,
};
pub use counters::{parse_counter_line, parse_counter_report, CounterLine};
pub use error::{
    ConfigurationError, ExternalError, FormatError, Result, SweepError, TrialError,
};
pub use metrics::{Metric, MetricVector};
pub use presets::{preset, Preset, PRESETS};
pub use row::{OutputRow, COLUMNS};
pub use sweep::{
    run_sweep, Baseline, BenchmarkSuite, RowSink, SweepController, SweepSummary, TrialOutput,
    WorkloadFailure,
};
pub use timing::{parse_elapsed, parse_timing_report};
