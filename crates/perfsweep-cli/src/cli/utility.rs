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

//! Utility commands for PerfSweep CLI.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

/// Utility commands.
#[derive(Subcommand)]
pub enum UtilityCommands {
    /// Parse a saved `perf stat -x,` report and print its metrics as JSON
    ParseReport {
        /// Counter report written by `perf stat -o <file> -x,`
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Output of the shell's `time`, adds run-time
        #[arg(long, value_name = "FILE")]
        timing: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the built-in presets
    Presets,
}

impl UtilityCommands {
    /// Execute the utility command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            UtilityCommands::ParseReport {
                report,
                timing,
                pretty,
            } => commands::parse_report(&report, timing.as_deref(), pretty),
            UtilityCommands::Presets => commands::presets(),
        }
    }
}
