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

//! The sweep controller.
//!
//! Drives workload → size → thread count → trial, strictly sequentially:
//!
//! ```text
//! for workload:   build
//!   for size:       (baseline unknown)
//!     for threads:    (1 first) fresh accumulator
//!       for trial:      run, parse, accumulate
//!       finalize, derive speedup against the group baseline, write row
//!   uninstall
//! ```
//!
//! The benchmark lifecycle and the dataset are reached through the
//! [`BenchmarkSuite`] and [`RowSink`] traits, so the controller can be
//! driven by scripted collaborators in tests.

use crate::accumulator::{MetricAccumulator, MetricAverages, TrialResult};
use crate::config::{Configuration, FailurePolicy, SweepPlan, Workload};
use crate::error::{ConfigurationError, ExternalError, Result, SweepError, TrialError};
use crate::row::OutputRow;
use std::convert::Infallible;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Raw outputs of one benchmark invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrialOutput {
    /// What the shell's `time` wrote.
    pub timing_text: String,
    /// The profiler's counter report.
    pub counter_report: String,
}

impl TrialOutput {
    /// Creates a trial output.
    pub fn new(timing_text: impl Into<String>, counter_report: impl Into<String>) -> Self {
        Self {
            timing_text: timing_text.into(),
            counter_report: counter_report.into(),
        }
    }
}

/// The benchmark suite's lifecycle.
///
/// Every call blocks until the underlying work has finished. Any error is a
/// hard failure for that call.
pub trait BenchmarkSuite {
    /// Builds a workload before any of its configurations run.
    fn build(&mut self, workload: &Workload) -> std::result::Result<(), ExternalError>;

    /// Executes one trial of a configuration under the profiler.
    fn run(&mut self, configuration: &Configuration)
        -> std::result::Result<TrialOutput, ExternalError>;

    /// Removes a workload after its sweep.
    fn uninstall(&mut self, workload: &Workload) -> std::result::Result<(), ExternalError>;
}

impl<S: BenchmarkSuite + ?Sized> BenchmarkSuite for &mut S {
    fn build(&mut self, workload: &Workload) -> std::result::Result<(), ExternalError> {
        (**self).build(workload)
    }

    fn run(
        &mut self,
        configuration: &Configuration,
    ) -> std::result::Result<TrialOutput, ExternalError> {
        (**self).run(configuration)
    }

    fn uninstall(&mut self, workload: &Workload) -> std::result::Result<(), ExternalError> {
        (**self).uninstall(workload)
    }
}

/// Destination of finalized rows. Rows are only ever appended.
pub trait RowSink {
    /// Error raised by the sink.
    type Error: fmt::Display;

    /// Appends one row.
    fn write_row(&mut self, row: &OutputRow) -> std::result::Result<(), Self::Error>;
}

impl RowSink for Vec<OutputRow> {
    type Error = Infallible;

    fn write_row(&mut self, row: &OutputRow) -> std::result::Result<(), Self::Error> {
        self.push(row.clone());
        Ok(())
    }
}

impl<W: RowSink + ?Sized> RowSink for &mut W {
    type Error = W::Error;

    fn write_row(&mut self, row: &OutputRow) -> std::result::Result<(), Self::Error> {
        (**self).write_row(row)
    }
}

/// Average run time of a group's single-thread configuration.
///
/// Only obtainable from a finalized single-thread configuration, so a
/// speedup can never be derived against an undefined baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    run_time: f64,
}

impl Baseline {
    /// Records the baseline of a group.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::NotSingleThread`] unless `configuration` runs
    /// one thread.
    pub fn from_single_thread(
        configuration: &Configuration,
        averages: &MetricAverages,
    ) -> std::result::Result<Self, ConfigurationError> {
        if !configuration.is_baseline() {
            return Err(ConfigurationError::NotSingleThread {
                threads: configuration.threads,
            });
        }
        Ok(Self {
            run_time: averages.run_time(),
        })
    }

    /// Baseline run time in seconds.
    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    /// Speedup of a configuration of the same group.
    pub fn speedup(&self, averages: &MetricAverages) -> f64 {
        self.run_time / averages.run_time()
    }
}

/// A workload abandoned under [`FailurePolicy::SkipWorkload`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadFailure {
    /// Workload name.
    pub workload: String,
    /// Why it was abandoned.
    pub error: SweepError,
}

/// Outcome of a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSummary {
    /// Rows written to the sink.
    pub rows_written: usize,
    /// Benchmark invocations performed.
    pub trials_run: u64,
    /// Workloads whose sweep completed.
    pub workloads_completed: usize,
    /// Workloads abandoned, in sweep order.
    pub failures: Vec<WorkloadFailure>,
}

impl SweepSummary {
    /// Whether every workload completed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs a [`SweepPlan`] against a suite, writing one row per configuration.
pub struct SweepController<'p, S, W> {
    plan: &'p SweepPlan,
    suite: S,
    sink: W,
    summary: SweepSummary,
}

impl<'p, S, W> SweepController<'p, S, W>
where
    S: BenchmarkSuite,
    W: RowSink,
{
    /// Creates a controller.
    pub fn new(plan: &'p SweepPlan, suite: S, sink: W) -> Self {
        Self {
            plan,
            suite,
            sink,
            summary: SweepSummary::default(),
        }
    }

    /// Runs the whole sweep.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure is returned; rows
    /// written before it stay written. Under
    /// [`FailurePolicy::SkipWorkload`] failures are collected in the
    /// summary and the sweep moves on to the next workload.
    pub fn run(mut self) -> Result<SweepSummary> {
        let plan = self.plan;
        info!(
            workloads = plan.workloads().len(),
            configurations = plan.configuration_count(),
            trials = plan.trial_count(),
            "starting sweep"
        );

        for workload in plan.workloads() {
            match self.sweep_workload(workload) {
                Ok(()) => self.summary.workloads_completed += 1,
                Err(err) => match plan.failure_policy() {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::SkipWorkload => {
                        error!(workload = %workload.name, error = %err, "skipping workload");
                        self.summary.failures.push(WorkloadFailure {
                            workload: workload.name.clone(),
                            error: err,
                        });
                    }
                },
            }
        }

        info!(
            rows = self.summary.rows_written,
            failed = self.summary.failures.len(),
            "sweep finished"
        );
        Ok(self.summary)
    }

    /// Returns the sink, e.g. to inspect an in-memory dataset.
    pub fn into_sink(self) -> W {
        self.sink
    }

    fn sweep_workload(&mut self, workload: &Workload) -> Result<()> {
        info!(workload = %workload.name, "building");
        self.suite
            .build(workload)
            .map_err(|source| SweepError::Build {
                workload: workload.name.clone(),
                source,
            })?;

        let swept = self.sweep_sizes(workload);

        info!(workload = %workload.name, "uninstalling");
        let uninstalled = self
            .suite
            .uninstall(workload)
            .map_err(|source| SweepError::Uninstall {
                workload: workload.name.clone(),
                source,
            });

        match (swept, uninstalled) {
            (Err(err), Err(cleanup)) => {
                warn!(workload = %workload.name, error = %cleanup, "cleanup after failed sweep also failed");
                Err(err)
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    fn sweep_sizes(&mut self, workload: &Workload) -> Result<()> {
        let plan = self.plan;
        for size in plan.sizes() {
            let mut baseline: Option<Baseline> = None;

            for configuration in plan.group(workload, size) {
                let averages = self.measure(&configuration)?;
                let finalize_err = |source| SweepError::Finalize {
                    configuration: configuration.clone(),
                    source,
                };

                if configuration.is_baseline() {
                    baseline = Some(
                        Baseline::from_single_thread(&configuration, &averages)
                            .map_err(finalize_err)?,
                    );
                }
                let baseline = baseline.ok_or_else(|| {
                    finalize_err(ConfigurationError::MissingBaseline {
                        workload: configuration.workload.clone(),
                        size: configuration.size.clone(),
                        threads: configuration.threads,
                    })
                })?;

                let row = OutputRow {
                    speedup: baseline.speedup(&averages),
                    baseline_secs: baseline.run_time(),
                    metrics: averages,
                    configuration,
                };
                self.emit(&row)?;
            }
        }
        Ok(())
    }

    fn measure(&mut self, configuration: &Configuration) -> Result<MetricAverages> {
        let trials = self.plan.trials();
        let mut accumulator = MetricAccumulator::new();

        for trial in 1..=trials {
            debug!(%configuration, trial, "running trial");
            let trial_err = |source: TrialError| SweepError::Trial {
                configuration: configuration.clone(),
                trial,
                source,
            };

            let output = self
                .suite
                .run(configuration)
                .map_err(|e| trial_err(e.into()))?;
            self.summary.trials_run += 1;

            let result = TrialResult::parse(&output.timing_text, &output.counter_report)
                .map_err(|e| trial_err(e.into()))?;
            accumulator
                .accumulate(&result)
                .map_err(|e| trial_err(e.into()))?;
            debug!(%configuration, trial, elapsed = result.elapsed_secs, "trial done");
        }

        accumulator
            .finalize(trials)
            .map_err(|source| SweepError::Finalize {
                configuration: configuration.clone(),
                source,
            })
    }

    fn emit(&mut self, row: &OutputRow) -> Result<()> {
        self.sink
            .write_row(row)
            .map_err(|e| SweepError::Output {
                configuration: row.configuration.clone(),
                message: e.to_string(),
            })?;
        self.summary.rows_written += 1;
        info!(
            configuration = %row.configuration,
            run_time = row.metrics.run_time(),
            speedup = row.speedup,
            "configuration done"
        );
        Ok(())
    }
}

/// Runs a sweep, collecting its rows into `sink`.
///
/// Shorthand for [`SweepController::new`] followed by
/// [`SweepController::run`].
pub fn run_sweep<S, W>(plan: &SweepPlan, suite: S, sink: W) -> Result<SweepSummary>
where
    S: BenchmarkSuite,
    W: RowSink,
{
    SweepController::new(plan, suite, sink).run()
}
