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

//! Run command - execute a sweep into a CSV dataset

use crate::config::{load_config, ConfigSource, Overrides};
use crate::error::CliError;
use crate::suite::ProcessSuite;
use colored::Colorize;
use perfsweep_core::{run_sweep, BenchmarkSuite, SweepPlan, SweepSummary};
use perfsweep_csv::DatasetWriter;
use std::path::Path;
use tracing::info;

/// Load, validate and run a sweep with the suite's real commands.
///
/// # Errors
///
/// Returns `Err` if the configuration is invalid, the dataset cannot be
/// created, the sweep aborts, or (with `--keep-going`) any workload was
/// skipped. Rows written before a failure stay in the dataset.
///
/// # Examples
///
/// ```no_run
/// use perfsweep_cli::commands::run;
/// use perfsweep_cli::config::{ConfigSource, Overrides};
/// use std::path::Path;
///
/// # fn main() -> Result<(), perfsweep_cli::error::CliError> {
/// run(
///     ConfigSource::Preset("splash"),
///     &Overrides::default(),
///     Path::new("splash.csv"),
///     Some(Path::new("Splash3/codes")),
///     Some(3600),
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn run(
    source: ConfigSource<'_>,
    overrides: &Overrides,
    output: &Path,
    suite_dir: Option<&Path>,
    timeout_secs: Option<u64>,
) -> Result<(), CliError> {
    let plan = overrides.apply(load_config(source)?)?;

    let mut suite = ProcessSuite::from_plan(&plan)?;
    if let Some(dir) = suite_dir {
        suite = suite.with_working_dir(dir);
    }
    if let Some(secs) = timeout_secs {
        suite = suite.with_timeout(secs);
    }

    let summary = run_plan(&plan, suite, output)?;
    report_summary(&summary, output);

    if summary.is_complete() {
        Ok(())
    } else {
        Err(CliError::Incomplete {
            failed: summary.failures.len(),
        })
    }
}

/// Run a validated plan against any suite, writing the dataset to `output`.
pub fn run_plan<S: BenchmarkSuite>(
    plan: &SweepPlan,
    suite: S,
    output: &Path,
) -> Result<SweepSummary, CliError> {
    let writer = DatasetWriter::create(output)?;
    info!(output = %output.display(), "writing dataset");
    Ok(run_sweep(plan, suite, writer)?)
}

fn report_summary(summary: &SweepSummary, output: &Path) {
    let mark = if summary.is_complete() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("{} {}", mark, output.display());
    println!("  Rows: {}", summary.rows_written);
    println!("  Trials: {}", summary.trials_run);
    println!("  Workloads completed: {}", summary.workloads_completed);
    for failure in &summary.failures {
        println!("  {} {}: {}", "skipped".yellow(), failure.workload, failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsweep_core::{FailurePolicy, SweepConfig, SweepError, Workload};
    use perfsweep_csv::read_dataset;
    use perfsweep_test::{single_group_plan, timing_text, PerfReport, ScriptedSuite};

    fn report() -> String {
        PerfReport::new()
            .with_ratio("instructions:u", 100.0, 0.5)
            .build()
    }

    #[test]
    fn test_run_plan_writes_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let plan = single_group_plan("fft", &[1, 2], 1);
        let suite = ScriptedSuite::new()
            .with_trial("fft", "small", 1, timing_text(8.0), report())
            .with_trial("fft", "small", 2, timing_text(4.0), report());

        let summary = run_plan(&plan, suite, &output).unwrap();
        assert_eq!(summary.rows_written, 2);

        let records = read_dataset(&output).unwrap();
        assert_eq!(records[1].speedup, 2.0);
    }

    #[test]
    fn test_run_plan_propagates_abort() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let plan = single_group_plan("fft", &[1], 1);
        let suite = ScriptedSuite::new().with_run_failure("fft", "small", 1);

        assert!(matches!(
            run_plan(&plan, suite, &output),
            Err(CliError::Sweep(SweepError::Trial { .. }))
        ));
        assert!(read_dataset(&output).unwrap().is_empty());
    }

    #[test]
    fn test_run_plan_reports_skipped_workloads() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let plan = SweepConfig::new(
            ["small"],
            vec![
                Workload::new("a").with_param("small", 1),
                Workload::new("b").with_param("small", 1),
            ],
        )
        .with_threads(&[1])
        .with_trials(1)
        .with_failure_policy(FailurePolicy::SkipWorkload)
        .validate()
        .unwrap();
        let suite = ScriptedSuite::new()
            .with_build_failure("b")
            .with_default(timing_text(1.0), report());

        let summary = run_plan(&plan, suite, &output).unwrap();
        assert!(!summary.is_complete());
        assert_eq!(summary.failures[0].workload, "b");
        assert_eq!(read_dataset(&output).unwrap().len(), 1);
    }
}
