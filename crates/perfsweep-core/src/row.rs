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

//! Output rows of the dataset.

use crate::accumulator::MetricAverages;
use crate::config::Configuration;
use crate::metrics::Metric;
use serde::Serialize;

/// Dataset columns, in order.
pub const COLUMNS: [&str; 21] = [
    "workload",
    "size",
    "size-param",
    "threads",
    "branch-instructions",
    "branch-misses",
    "cache-misses",
    "cache-references",
    "cycles",
    "instructions",
    "cpu-clock",
    "page-faults",
    "L1-dcache-loads",
    "L1-icache-load-misses",
    "LLC-load-misses",
    "ipc",
    "cache-miss-rate",
    "branch-miss-rate",
    "run-time",
    "baseline-time",
    "speedup",
];

/// Columns preceding the metric columns.
const LEADING_COLUMNS: usize = 4;

/// One finalized configuration, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    /// The measured configuration.
    pub configuration: Configuration,
    /// Per-trial averages.
    pub metrics: MetricAverages,
    /// Average run time of the group's single-thread configuration.
    pub baseline_secs: f64,
    /// `baseline_secs / run_time`.
    pub speedup: f64,
}

impl OutputRow {
    /// Dataset header.
    pub fn header() -> &'static [&'static str] {
        &COLUMNS
    }

    /// Row fields in [`COLUMNS`] order. Metrics no trial reported are `0`.
    pub fn record(&self) -> Vec<String> {
        let c = &self.configuration;
        let mut fields = Vec::with_capacity(COLUMNS.len());
        fields.push(c.workload.clone());
        fields.push(c.size.clone());
        fields.push(c.param.to_string());
        fields.push(c.threads.to_string());
        fields.extend(Metric::ALL.iter().map(|m| self.metrics.value(*m).to_string()));
        fields.push(self.baseline_secs.to_string());
        fields.push(self.speedup.to_string());
        fields
    }
}

/// Index of a metric's column in [`COLUMNS`].
pub fn metric_column(metric: Metric) -> usize {
    LEADING_COLUMNS + metric.index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{MetricAccumulator, TrialResult};
    use crate::metrics::MetricVector;

    #[test]
    fn test_metric_columns_follow_metric_order() {
        for metric in Metric::ALL {
            assert_eq!(COLUMNS[metric_column(metric)], metric.name());
        }
        assert_eq!(COLUMNS[COLUMNS.len() - 2], "baseline-time");
        assert_eq!(COLUMNS[COLUMNS.len() - 1], "speedup");
    }

    #[test]
    fn test_record_shape() {
        let mut counters = MetricVector::new();
        counters.add(Metric::Instructions, 100.0);
        counters.add(Metric::Ipc, 0.5);
        let mut acc = MetricAccumulator::new();
        acc.accumulate(&TrialResult::new(4.0, counters)).unwrap();

        let row = OutputRow {
            configuration: Configuration::new("A", "small", 10, 2),
            metrics: acc.finalize(1).unwrap(),
            baseline_secs: 10.0,
            speedup: 2.5,
        };
        let record = row.record();
        assert_eq!(record.len(), COLUMNS.len());
        assert_eq!(&record[..4], &["A", "small", "10", "2"]);
        assert_eq!(record[metric_column(Metric::Instructions)], "100");
        assert_eq!(record[metric_column(Metric::Ipc)], "0.5");
        assert_eq!(record[metric_column(Metric::Cycles)], "0");
        assert_eq!(record[metric_column(Metric::RunTime)], "4");
        assert_eq!(record[19], "10");
        assert_eq!(record[20], "2.5");
    }
}
