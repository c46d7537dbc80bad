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

//! PerfSweep CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **run**: sweep workloads × sizes × thread counts under `perf stat`
//!   and write a CSV dataset with averaged counters and speedups
//! - **plan**: validate a configuration and list its configurations
//! - **parse-report**: print a saved `perf stat -x,` report as JSON
//! - **presets**: list the built-in PARSEC and Splash-3 tables
//!
//! # Examples
//!
//! ```no_run
//! use perfsweep_cli::commands::plan;
//! use perfsweep_cli::config::{ConfigSource, Overrides};
//!
//! # fn main() -> Result<(), perfsweep_cli::error::CliError> {
//! let overrides = Overrides {
//!     threads: Some(vec![1, 2, 4]),
//!     ..Overrides::default()
//! };
//! plan(ConfigSource::Preset("parsec"), &overrides)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Sweeps shell out to `bash`, `perf` and, with `--timeout`, coreutils
//! `timeout`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod suite;
