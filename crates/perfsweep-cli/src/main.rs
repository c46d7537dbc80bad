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

//! PerfSweep Command Line Interface

use clap::Parser;
use perfsweep_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// PerfSweep - parallel scaling measurement sweeps
///
/// # Examples
///
/// ```bash
/// # List what a Splash-3 sweep would measure
/// perfsweep plan --preset splash --threads 1,2,4
///
/// # Run it from the Splash-3 source tree
/// perfsweep run --preset splash --suite-dir Splash3/codes --output splash.csv
///
/// # Run a custom suite, skipping workloads that fail
/// perfsweep run --config sweep.yaml --keep-going
///
/// # Inspect a saved perf report
/// perfsweep parse-report perf.csv --timing time.txt --pretty
/// ```
#[derive(Parser)]
#[command(name = "perfsweep")]
#[command(author, version, about = "PerfSweep - parallel scaling measurement sweeps", long_about = None)]
struct Cli {
    /// Log every trial (same as RUST_LOG=debug for perfsweep crates)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env();
    for krate in ["perfsweep_core", "perfsweep_cli"] {
        if let Ok(directive) = format!("{}={}", krate, level).parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
