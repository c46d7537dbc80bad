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

//! Benchmark suite backed by shell commands.
//!
//! Every lifecycle step is a command template rendered for the current
//! workload or configuration and run through `bash -c`. A trial wraps the
//! run command as
//!
//! ```text
//! time perf stat -o <report> -x, -e <events> -- <run command>
//! ```
//!
//! so the shell's `time` output arrives on stderr and the counter report in
//! a private temporary file. Suites whose run command reports its own
//! `real` line on stdout ([`TimingSource::Stdout`]) drop the outer `time`
//! and are timed from that line instead.

use crate::error::CliError;
use perfsweep_core::{
    BenchmarkSuite, Configuration, ExternalError, Metric, SuiteCommands, SweepPlan, TimingSource,
    TrialOutput, Workload,
};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::{debug, trace};

/// Exit status coreutils `timeout` reports for a killed command.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Profiler binary.
pub const PROFILER: &str = "perf";

/// Renders a configuration's placeholders into a command template.
///
/// ```
/// use perfsweep_cli::suite::render;
/// use perfsweep_core::Configuration;
///
/// let c = Configuration::new("fft", "small", 20, 4);
/// assert_eq!(render("./FFT -p{threads} -m{param}", &c), "./FFT -p4 -m20");
/// ```
pub fn render(template: &str, configuration: &Configuration) -> String {
    template
        .replace("{workload}", &configuration.workload)
        .replace("{size}", &configuration.size)
        .replace("{param}", &configuration.param.to_string())
        .replace("{threads}", &configuration.threads.to_string())
}

fn render_workload(template: &str, workload: &Workload) -> String {
    template.replace("{workload}", &workload.name)
}

/// Single-quotes a word for `bash`.
///
/// ```
/// use perfsweep_cli::suite::shell_quote;
///
/// assert_eq!(shell_quote("/tmp/my dir/r.csv"), "'/tmp/my dir/r.csv'");
/// assert_eq!(shell_quote("it's"), r"'it'\''s'");
/// ```
pub fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Builds the profiled trial script.
pub fn trial_script(
    profiler: &str,
    events: &[Metric],
    report: &str,
    command: &str,
    timing: TimingSource,
) -> String {
    let events = events
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(",");
    let time = match timing {
        TimingSource::Stderr => "time ",
        TimingSource::Stdout => "",
    };
    format!(
        "{}{} stat -o {} -x, -e {} -- {}",
        time,
        profiler,
        shell_quote(report),
        events,
        command
    )
}

/// Runs the suite's commands as child processes.
#[derive(Debug, Clone)]
pub struct ProcessSuite {
    commands: SuiteCommands,
    run_templates: HashMap<String, String>,
    events: Vec<Metric>,
    working_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    profiler: String,
}

impl ProcessSuite {
    /// Creates a suite for a plan.
    ///
    /// # Errors
    ///
    /// [`CliError::MissingRunCommand`] if a workload has no run template of
    /// its own and the suite has none either.
    pub fn from_plan(plan: &SweepPlan) -> Result<Self, CliError> {
        let commands = plan.suite().clone();
        let mut run_templates = HashMap::new();
        for workload in plan.workloads() {
            let template = workload
                .run
                .as_ref()
                .or(commands.run.as_ref())
                .ok_or_else(|| CliError::MissingRunCommand(workload.name.clone()))?;
            run_templates.insert(workload.name.clone(), template.clone());
        }
        Ok(Self {
            commands,
            run_templates,
            events: plan.events().to_vec(),
            working_dir: None,
            timeout_secs: None,
            profiler: PROFILER.to_string(),
        })
    }

    /// Runs every command from this directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Profiles trials with this `perf` binary instead of the one on `PATH`.
    pub fn with_profiler(mut self, profiler: impl Into<String>) -> Self {
        self.profiler = profiler.into();
        self
    }

    /// Kills any command running longer than this.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    fn command(&self, script: &str) -> Command {
        let mut command = match self.timeout_secs {
            Some(secs) => {
                let mut c = Command::new("timeout");
                c.arg(format!("{}s", secs)).arg("bash");
                c
            }
            None => Command::new("bash"),
        };
        command.arg("-c").arg(script);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    fn execute(&self, script: &str) -> Result<Output, ExternalError> {
        debug!(command = script, "executing");
        let output = self
            .command(script)
            .output()
            .map_err(|e| ExternalError::Spawn {
                command: script.to_string(),
                message: e.to_string(),
            })?;

        match (self.timeout_secs, output.status.code()) {
            (Some(timeout_secs), Some(TIMEOUT_EXIT_CODE)) => Err(ExternalError::TimedOut {
                command: script.to_string(),
                timeout_secs,
            }),
            _ if !output.status.success() => {
                trace!(stderr = %String::from_utf8_lossy(&output.stderr), "command failed");
                Err(ExternalError::NonZeroExit {
                    command: script.to_string(),
                    status: output.status.to_string(),
                })
            }
            _ => Ok(output),
        }
    }

    fn lifecycle(&self, template: Option<&String>, workload: &Workload) -> Result<(), ExternalError> {
        match template {
            Some(template) => self.execute(&render_workload(template, workload)).map(|_| ()),
            None => Ok(()),
        }
    }
}

impl BenchmarkSuite for ProcessSuite {
    fn build(&mut self, workload: &Workload) -> Result<(), ExternalError> {
        self.lifecycle(self.commands.build.as_ref(), workload)
    }

    fn run(&mut self, configuration: &Configuration) -> Result<TrialOutput, ExternalError> {
        let template = self
            .run_templates
            .get(&configuration.workload)
            .ok_or_else(|| ExternalError::Spawn {
                command: configuration.workload.clone(),
                message: "no run command for this workload".to_string(),
            })?;

        let report = tempfile::Builder::new()
            .prefix("perfsweep-")
            .suffix(".csv")
            .tempfile()
            .map_err(|e| output_error(std::env::temp_dir(), e))?;
        let report_path = report.path().to_path_buf();

        let timing = self.commands.timing;
        let script = trial_script(
            &self.profiler,
            &self.events,
            &report_path.display().to_string(),
            &render(template, configuration),
            timing,
        );
        let output = self.execute(&script)?;

        let counter_report =
            fs::read_to_string(&report_path).map_err(|e| output_error(report_path, e))?;
        let timing_text = match timing {
            TimingSource::Stderr => String::from_utf8_lossy(&output.stderr),
            TimingSource::Stdout => String::from_utf8_lossy(&output.stdout),
        };
        Ok(TrialOutput::new(timing_text, counter_report))
    }

    fn uninstall(&mut self, workload: &Workload) -> Result<(), ExternalError> {
        self.lifecycle(self.commands.uninstall.as_ref(), workload)
    }
}

fn output_error(path: PathBuf, err: io::Error) -> ExternalError {
    ExternalError::Output {
        path,
        message: err.to_string(),
    }
}
