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

//! Per-configuration metric accumulation.
//!
//! A [`MetricAccumulator`] lives for exactly one configuration: it is
//! created before the first trial, receives one [`TrialResult`] per trial,
//! and is consumed by [`MetricAccumulator::finalize`], which turns the
//! running sums into per-trial averages. Consuming the accumulator makes
//! "accumulate after finalize" unrepresentable; finalizing early is caught
//! by the trial count check.

use crate::counters::parse_counter_report;
use crate::error::{ConfigurationError, FormatError};
use crate::metrics::{Metric, MetricVector};
use crate::timing::parse_timing_report;
use serde::Serialize;

/// Raw outputs of one benchmark execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    /// Elapsed wall-clock seconds.
    pub elapsed_secs: f64,
    /// Counter values and their derived ratios for this trial.
    pub counters: MetricVector,
}

impl TrialResult {
    /// Creates a trial result from already-parsed values.
    pub fn new(elapsed_secs: f64, counters: MetricVector) -> Self {
        Self {
            elapsed_secs,
            counters,
        }
    }

    /// Parses the timing text and counter report of one execution.
    ///
    /// # Errors
    ///
    /// Either parser's [`FormatError`]; nothing is defaulted.
    pub fn parse(timing_text: &str, counter_report: &str) -> Result<Self, FormatError> {
        let elapsed_secs = parse_timing_report(timing_text)?;
        let counters = parse_counter_report(counter_report)?;
        Ok(Self::new(elapsed_secs, counters))
    }

    /// All metrics of the trial, run time included.
    pub fn metrics(&self) -> MetricVector {
        let mut metrics = self.counters;
        metrics.set(Metric::RunTime, self.elapsed_secs);
        metrics
    }
}

/// Running sums over the trials of one configuration.
#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    sums: MetricVector,
    trials: u32,
}

impl MetricAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trials accumulated so far.
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Current running sums.
    pub fn sums(&self) -> &MetricVector {
        &self.sums
    }

    /// Adds one trial to the running sums.
    ///
    /// # Errors
    ///
    /// [`FormatError::ZeroRunTime`] if the trial's elapsed time is not
    /// positive, [`FormatError::InconsistentCounters`] if it reports a
    /// different metric set than the earlier trials. The accumulator is left
    /// unchanged in both cases.
    pub fn accumulate(&mut self, trial: &TrialResult) -> Result<(), FormatError> {
        // speedup divides by the average, which must stay positive
        if trial.elapsed_secs.is_nan() || trial.elapsed_secs <= 0.0 {
            return Err(FormatError::ZeroRunTime);
        }
        let metrics = trial.metrics();
        if self.trials > 0 && !self.sums.same_metrics(&metrics) {
            return Err(FormatError::InconsistentCounters {
                expected: self.sums.metric_names(),
                actual: metrics.metric_names(),
            });
        }
        self.sums.merge(&metrics);
        self.trials += 1;
        Ok(())
    }

    /// Divides the running sums by the trial count.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::TrialCountMismatch`] unless exactly
    /// `expected_trials` (at least one) trials were accumulated.
    pub fn finalize(self, expected_trials: u32) -> Result<MetricAverages, ConfigurationError> {
        if self.trials == 0 || self.trials != expected_trials {
            return Err(ConfigurationError::TrialCountMismatch {
                expected: expected_trials,
                actual: self.trials,
            });
        }
        let mut values = self.sums;
        values.divide(f64::from(self.trials));
        Ok(MetricAverages {
            values,
            trials: self.trials,
        })
    }
}

/// Per-trial averages of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricAverages {
    values: MetricVector,
    trials: u32,
}

impl MetricAverages {
    /// Averaged metric, if any trial reported it.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric)
    }

    /// Averaged metric, zero if never reported.
    pub fn value(&self, metric: Metric) -> f64 {
        self.values.value(metric)
    }

    /// Average wall-clock seconds.
    pub fn run_time(&self) -> f64 {
        self.values.value(Metric::RunTime)
    }

    /// Number of trials averaged.
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// The averaged vector.
    pub fn values(&self) -> &MetricVector {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(elapsed: f64, instructions: f64, ipc: f64) -> TrialResult {
        let mut counters = MetricVector::new();
        counters.add(Metric::Instructions, instructions);
        counters.add(Metric::Ipc, ipc);
        TrialResult::new(elapsed, counters)
    }

    #[test]
    fn test_averages_over_trials() {
        let mut acc = MetricAccumulator::new();
        acc.accumulate(&trial(10.0, 100.0, 0.5)).unwrap();
        acc.accumulate(&trial(20.0, 300.0, 1.5)).unwrap();
        assert_eq!(acc.trials(), 2);
        assert_eq!(acc.sums().get(Metric::RunTime), Some(30.0));

        let avg = acc.finalize(2).unwrap();
        assert_eq!(avg.run_time(), 15.0);
        assert_eq!(avg.get(Metric::Instructions), Some(200.0));
        assert_eq!(avg.get(Metric::Ipc), Some(1.0));
        assert_eq!(avg.get(Metric::Cycles), None);
        assert_eq!(avg.value(Metric::Cycles), 0.0);
        assert_eq!(avg.trials(), 2);
    }

    #[test]
    fn test_identical_trials_average_to_themselves() {
        let t = trial(3.25, 12345.0, 0.75);
        let mut acc = MetricAccumulator::new();
        for _ in 0..7 {
            acc.accumulate(&t).unwrap();
        }
        let avg = acc.finalize(7).unwrap();
        for (metric, value) in t.metrics().iter() {
            let got = avg.get(metric).unwrap();
            assert!((got - value).abs() <= value.abs() * 1e-12, "{metric}: {got} vs {value}");
        }
    }

    #[test]
    fn test_finalize_early_is_rejected() {
        let mut acc = MetricAccumulator::new();
        acc.accumulate(&trial(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(
            acc.finalize(5).unwrap_err(),
            ConfigurationError::TrialCountMismatch {
                expected: 5,
                actual: 1
            }
        );
    }

    #[test]
    fn test_finalize_without_trials_is_rejected() {
        assert_eq!(
            MetricAccumulator::new().finalize(0).unwrap_err(),
            ConfigurationError::TrialCountMismatch {
                expected: 0,
                actual: 0
            }
        );
    }

    #[test]
    fn test_zero_run_time_is_rejected() {
        let mut acc = MetricAccumulator::new();
        acc.accumulate(&trial(2.0, 1.0, 1.0)).unwrap();
        assert_eq!(
            acc.accumulate(&trial(0.0, 1.0, 1.0)),
            Err(FormatError::ZeroRunTime)
        );
        assert_eq!(acc.trials(), 1);
        assert_eq!(acc.sums().get(Metric::RunTime), Some(2.0));
    }

    #[test]
    fn test_inconsistent_metric_sets() {
        let mut acc = MetricAccumulator::new();
        acc.accumulate(&trial(1.0, 1.0, 1.0)).unwrap();

        let mut counters = MetricVector::new();
        counters.add(Metric::Instructions, 1.0);
        let err = acc
            .accumulate(&TrialResult::new(1.0, counters))
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::InconsistentCounters {
                expected: "instructions,ipc,run-time".to_string(),
                actual: "instructions,run-time".to_string(),
            }
        );
        assert_eq!(acc.trials(), 1);
    }

    #[test]
    fn test_parse_trial() {
        let timing = "real\t0m4.000s\nuser\t0m7.9s\nsys\t0m0.1s\n";
        let report = "# started on today\n\n100,,instructions:u,1,100.00,0.5,insn per cycle\n";
        let trial = TrialResult::parse(timing, report).unwrap();
        assert_eq!(trial.elapsed_secs, 4.0);
        assert_eq!(trial.counters.get(Metric::Ipc), Some(0.5));
        assert_eq!(trial.metrics().get(Metric::RunTime), Some(4.0));
    }

    #[test]
    fn test_parse_trial_missing_timing() {
        let report = "# started on today\n\n100,,cycles,1,100.00,,\n";
        assert_eq!(
            TrialResult::parse("user\t0m1.0s\n", report).unwrap_err(),
            FormatError::MissingTimingLine
        );
    }
}
