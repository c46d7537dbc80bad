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

//! The enumerated metric set and fixed-shape metric storage.
//!
//! Every configuration produces the same vector of metrics: the hardware
//! counters requested from the profiler, three ratios the profiler reports
//! alongside specific counters, and the wall-clock run time. Storage is a
//! fixed array indexed by [`Metric`], zero-initialized, with a presence flag
//! per slot so callers can tell "reported as zero" from "never reported".

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A metric column of the output dataset.
///
/// Variant order is the dataset column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Retired branch instructions.
    #[serde(rename = "branch-instructions")]
    BranchInstructions,
    /// Mispredicted branches.
    #[serde(rename = "branch-misses")]
    BranchMisses,
    /// Last-level cache misses.
    #[serde(rename = "cache-misses")]
    CacheMisses,
    /// Last-level cache references.
    #[serde(rename = "cache-references")]
    CacheReferences,
    /// CPU cycles.
    #[serde(rename = "cycles")]
    Cycles,
    /// Retired instructions.
    #[serde(rename = "instructions")]
    Instructions,
    /// Task clock in milliseconds.
    #[serde(rename = "cpu-clock")]
    CpuClock,
    /// Page faults.
    #[serde(rename = "page-faults")]
    PageFaults,
    /// L1 data cache loads.
    #[serde(rename = "L1-dcache-loads")]
    L1DcacheLoads,
    /// L1 instruction cache load misses.
    #[serde(rename = "L1-icache-load-misses")]
    L1IcacheLoadMisses,
    /// Last-level cache load misses.
    #[serde(rename = "LLC-load-misses")]
    LlcLoadMisses,
    /// Instructions per cycle, reported next to `instructions`.
    #[serde(rename = "ipc")]
    Ipc,
    /// Percentage of cache references that missed, reported next to `cache-misses`.
    #[serde(rename = "cache-miss-rate")]
    CacheMissRate,
    /// Percentage of branches mispredicted, reported next to `branch-misses`.
    #[serde(rename = "branch-miss-rate")]
    BranchMissRate,
    /// Wall-clock run time in seconds.
    #[serde(rename = "run-time")]
    RunTime,
}

impl Metric {
    /// Number of metrics.
    pub const COUNT: usize = 15;

    /// All metrics in column order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::BranchInstructions,
        Metric::BranchMisses,
        Metric::CacheMisses,
        Metric::CacheReferences,
        Metric::Cycles,
        Metric::Instructions,
        Metric::CpuClock,
        Metric::PageFaults,
        Metric::L1DcacheLoads,
        Metric::L1IcacheLoadMisses,
        Metric::LlcLoadMisses,
        Metric::Ipc,
        Metric::CacheMissRate,
        Metric::BranchMissRate,
        Metric::RunTime,
    ];

    /// Metrics that are requested from the profiler as events.
    pub const COUNTERS: [Metric; 11] = [
        Metric::BranchInstructions,
        Metric::BranchMisses,
        Metric::CacheMisses,
        Metric::CacheReferences,
        Metric::Cycles,
        Metric::Instructions,
        Metric::CpuClock,
        Metric::PageFaults,
        Metric::L1DcacheLoads,
        Metric::L1IcacheLoadMisses,
        Metric::LlcLoadMisses,
    ];

    /// Column name of the metric, which for counters is also the profiler event name.
    pub const fn name(self) -> &'static str {
        match self {
            Metric::BranchInstructions => "branch-instructions",
            Metric::BranchMisses => "branch-misses",
            Metric::CacheMisses => "cache-misses",
            Metric::CacheReferences => "cache-references",
            Metric::Cycles => "cycles",
            Metric::Instructions => "instructions",
            Metric::CpuClock => "cpu-clock",
            Metric::PageFaults => "page-faults",
            Metric::L1DcacheLoads => "L1-dcache-loads",
            Metric::L1IcacheLoadMisses => "L1-icache-load-misses",
            Metric::LlcLoadMisses => "LLC-load-misses",
            Metric::Ipc => "ipc",
            Metric::CacheMissRate => "cache-miss-rate",
            Metric::BranchMissRate => "branch-miss-rate",
            Metric::RunTime => "run-time",
        }
    }

    /// Slot of the metric in a [`MetricVector`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the metric is a profiler event.
    pub fn is_counter(self) -> bool {
        self.index() < Metric::COUNTERS.len()
    }

    /// Looks up a counter by its (modifier-free) profiler event name.
    ///
    /// Derived metrics and the run time are never reported as events and
    /// return `None`.
    pub fn from_counter_name(name: &str) -> Option<Metric> {
        Metric::COUNTERS.into_iter().find(|m| m.name() == name)
    }

    /// The derived ratio the profiler reports on the same line as `event`.
    pub fn derived_for_event(event: &str) -> Option<Metric> {
        if event.starts_with("instructions") {
            Some(Metric::Ipc)
        } else if event.starts_with("cache-misses") {
            Some(Metric::CacheMissRate)
        } else if event.starts_with("branch-misses") {
            Some(Metric::BranchMissRate)
        } else {
            None
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric '{}'", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// Fixed-shape storage for one value per [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricVector {
    values: [f64; Metric::COUNT],
    present: [bool; Metric::COUNT],
}

impl MetricVector {
    /// Creates a vector with every metric at zero and absent.
    pub fn new() -> Self {
        Self {
            values: [0.0; Metric::COUNT],
            present: [false; Metric::COUNT],
        }
    }

    /// Adds `value` to the metric, marking it present.
    pub fn add(&mut self, metric: Metric, value: f64) {
        self.values[metric.index()] += value;
        self.present[metric.index()] = true;
    }

    /// Overwrites the metric with `value`, marking it present.
    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values[metric.index()] = value;
        self.present[metric.index()] = true;
    }

    /// Returns the metric if it has been reported.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.present[metric.index()].then(|| self.values[metric.index()])
    }

    /// Returns the metric, or zero if it was never reported.
    pub fn value(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// Whether the metric has been reported.
    pub fn contains(&self, metric: Metric) -> bool {
        self.present[metric.index()]
    }

    /// Number of reported metrics.
    pub fn len(&self) -> usize {
        self.present.iter().filter(|p| **p).count()
    }

    /// Whether no metric has been reported.
    pub fn is_empty(&self) -> bool {
        !self.present.iter().any(|p| *p)
    }

    /// Reported metrics and their values, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter(|m| self.contains(*m))
            .map(|m| (m, self.value(m)))
    }

    /// Whether both vectors report exactly the same metrics.
    pub fn same_metrics(&self, other: &MetricVector) -> bool {
        self.present == other.present
    }

    /// Adds every reported metric of `other` into `self`.
    pub fn merge(&mut self, other: &MetricVector) {
        for (metric, value) in other.iter() {
            self.add(metric, value);
        }
    }

    /// Divides every reported metric by `divisor`.
    pub(crate) fn divide(&mut self, divisor: f64) {
        for metric in Metric::ALL {
            if self.contains(metric) {
                self.values[metric.index()] /= divisor;
            }
        }
    }

    /// Comma-separated names of the reported metrics.
    pub fn metric_names(&self) -> String {
        self.iter()
            .map(|(m, _)| m.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for MetricVector {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for MetricVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.name(), &value)?;
        }
        map.end()
    }
}
