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

//! CLI command definitions and argument parsing.
//!
//! - [`sweep`]: commands that load sweep tables (run, plan)
//! - [`utility`]: standalone helpers (parse-report, presets)

mod sweep;
mod utility;

use clap::Subcommand;

pub use sweep::{SweepArgs, SweepCommands};
pub use utility::UtilityCommands;

/// Top-level CLI commands enum.
///
/// ```text
/// Commands
/// ├── Sweep (run, plan)
/// └── Utility (parse-report, presets)
/// ```
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use perfsweep_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Sweep(SweepCommands),

    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration cannot be loaded or validated, a
    /// benchmark or the profiler fails, or the dataset cannot be written.
    pub fn execute(self) -> Result<(), crate::error::CliError> {
        match self {
            Commands::Sweep(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
