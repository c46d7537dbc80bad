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

//! Sweep commands for PerfSweep CLI.

use crate::commands;
use crate::config::{ConfigSource, Overrides};
use crate::error::CliError;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Selects the sweep tables and narrows them.
#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Built-in preset (parsec, splash)
    #[arg(long, value_name = "NAME", required_unless_present = "config", conflicts_with = "config")]
    pub preset: Option<String>,

    /// YAML or JSON sweep configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Thread counts, comma-separated, ascending from 1
    #[arg(long, value_delimiter = ',', value_name = "N,...")]
    pub threads: Option<Vec<u32>>,

    /// Trials per configuration
    #[arg(long, value_name = "N")]
    pub trials: Option<u32>,

    /// Only sweep this workload (repeatable)
    #[arg(short, long = "workload", value_name = "NAME")]
    pub workloads: Vec<String>,
}

impl SweepArgs {
    /// Where to load the tables from.
    pub fn source(&self) -> ConfigSource<'_> {
        match &self.config {
            Some(path) => ConfigSource::File(path),
            None => ConfigSource::Preset(self.preset.as_deref().unwrap_or_default()),
        }
    }

    /// The command-line overrides.
    pub fn overrides(&self, keep_going: bool) -> Overrides {
        Overrides {
            threads: self.threads.clone(),
            trials: self.trials,
            workloads: self.workloads.clone(),
            keep_going,
        }
    }
}

/// Sweep commands.
#[derive(Subcommand)]
pub enum SweepCommands {
    /// Run a measurement sweep and write the dataset
    ///
    /// Builds each workload, runs every (size, threads) configuration the
    /// configured number of times under `perf stat`, and appends one CSV
    /// row per configuration with averaged counters and speedup.
    Run {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Dataset output file
        #[arg(short, long, value_name = "FILE", default_value = "results.csv")]
        output: PathBuf,

        /// Directory the suite's commands run in
        #[arg(long, value_name = "DIR")]
        suite_dir: Option<PathBuf>,

        /// Kill any single command after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Skip a failing workload instead of stopping the sweep
        #[arg(long)]
        keep_going: bool,
    },

    /// Validate a configuration and list what a run would measure
    Plan {
        #[command(flatten)]
        sweep: SweepArgs,
    },
}

impl SweepCommands {
    /// Execute the sweep command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            SweepCommands::Run {
                sweep,
                output,
                suite_dir,
                timeout,
                keep_going,
            } => commands::run(
                sweep.source(),
                &sweep.overrides(keep_going),
                &output,
                suite_dir.as_deref(),
                timeout,
            ),
            SweepCommands::Plan { sweep } => {
                commands::plan(sweep.source(), &sweep.overrides(false))
            }
        }
    }
}
