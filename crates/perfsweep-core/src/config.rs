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

//! Sweep tables and their validation.
//!
//! A [`SweepConfig`] is plain data, usually deserialized from YAML or JSON
//! or taken from a [preset](crate::presets). Before anything runs it is
//! validated into a [`SweepPlan`], which is the only thing the
//! [`SweepController`](crate::SweepController) accepts.
//!
//! # Example
//!
//! ```
//! use perfsweep_core::{SweepConfig, Workload};
//!
//! let config = SweepConfig::new(
//!     ["small", "large"],
//!     vec![Workload::new("fft").with_param("small", 20).with_param("large", 24)],
//! )
//! .with_threads(&[1, 2, 4])
//! .with_trials(3);
//!
//! let plan = config.validate().unwrap();
//! assert_eq!(plan.configuration_count(), 6);
//! ```

use crate::error::ConfigurationError;
use crate::metrics::Metric;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Default thread counts, doubling from the single-thread baseline.
pub const DEFAULT_THREADS: &[u32] = &[1, 2, 4, 8, 16, 32];

/// Default number of trials per configuration.
pub const DEFAULT_TRIALS: u32 = 5;

fn default_threads() -> Vec<u32> {
    DEFAULT_THREADS.to_vec()
}

fn default_trials() -> u32 {
    DEFAULT_TRIALS
}

fn default_events() -> Vec<Metric> {
    Metric::COUNTERS.to_vec()
}

/// One measurement point of the sweep.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Configuration {
    /// Workload name.
    pub workload: String,
    /// Problem size label.
    pub size: String,
    /// Numeric parameter the label maps to for this workload.
    pub param: u64,
    /// Thread count.
    pub threads: u32,
}

impl Configuration {
    /// Creates a configuration.
    pub fn new(workload: impl Into<String>, size: impl Into<String>, param: u64, threads: u32) -> Self {
        Self {
            workload: workload.into(),
            size: size.into(),
            param,
            threads,
        }
    }

    /// Whether this is the single-thread baseline of its group.
    pub fn is_baseline(&self) -> bool {
        self.threads == 1
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "workload '{}', size '{}' ({}), {} thread{}",
            self.workload,
            self.size,
            self.param,
            self.threads,
            if self.threads == 1 { "" } else { "s" }
        )
    }
}

/// Output stream carrying a trial's `real` wall-clock line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingSource {
    /// The shell's `time` around the whole profiled command.
    #[default]
    Stderr,
    /// The benchmark's own timing, printed on stdout (e.g. `parsecmgmt`).
    Stdout,
}

/// Command templates for the benchmark lifecycle.
///
/// Templates may use `{workload}`, `{size}`, `{param}` and `{threads}`;
/// build and uninstall only see `{workload}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteCommands {
    /// Builds one workload.
    #[serde(default)]
    pub build: Option<String>,
    /// Runs one trial; overridden per workload by [`Workload::run`].
    #[serde(default)]
    pub run: Option<String>,
    /// Removes one workload's build.
    #[serde(default)]
    pub uninstall: Option<String>,
    /// Where the wall-clock time of a trial is read from.
    #[serde(default)]
    pub timing: TimingSource,
}

/// A benchmark of the suite and its problem-size table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workload {
    /// Workload name.
    pub name: String,
    /// Problem-size label to numeric parameter.
    #[serde(default)]
    pub params: BTreeMap<String, u64>,
    /// Run command template for this workload only.
    #[serde(default)]
    pub run: Option<String>,
}

impl Workload {
    /// Creates a workload with an empty size table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
            run: None,
        }
    }

    /// Maps a size label to its parameter.
    pub fn with_param(mut self, size: impl Into<String>, param: u64) -> Self {
        self.params.insert(size.into(), param);
        self
    }

    /// Sets the workload's own run command template.
    pub fn with_run(mut self, template: impl Into<String>) -> Self {
        self.run = Some(template.into());
        self
    }

    /// Parameter for a size label.
    pub fn param(&self, size: &str) -> Option<u64> {
        self.params.get(size).copied()
    }
}

/// What the sweep does when a workload fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the whole sweep at the first failure.
    #[default]
    Abort,
    /// Abandon the failing workload and continue with the next one.
    SkipWorkload,
}

/// Raw sweep tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SweepConfig {
    /// Suite lifecycle commands.
    #[serde(default)]
    pub suite: SuiteCommands,
    /// Problem-size labels, in sweep order.
    pub sizes: Vec<String>,
    /// Thread counts, ascending and starting at 1.
    #[serde(default = "default_threads")]
    pub threads: Vec<u32>,
    /// Trials per configuration.
    #[serde(default = "default_trials")]
    pub trials: u32,
    /// Profiler events to record.
    #[serde(default = "default_events")]
    pub events: Vec<Metric>,
    /// Reaction to a failing workload.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Workloads, in sweep order.
    pub workloads: Vec<Workload>,
}

impl SweepConfig {
    /// Creates a configuration with default threads, trials and events.
    pub fn new<I, S>(sizes: I, workloads: Vec<Workload>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suite: SuiteCommands::default(),
            sizes: sizes.into_iter().map(Into::into).collect(),
            threads: default_threads(),
            trials: DEFAULT_TRIALS,
            events: default_events(),
            failure_policy: FailurePolicy::default(),
            workloads,
        }
    }

    /// Sets the lifecycle commands.
    pub fn with_suite(mut self, suite: SuiteCommands) -> Self {
        self.suite = suite;
        self
    }

    /// Sets the thread counts.
    pub fn with_threads(mut self, threads: &[u32]) -> Self {
        self.threads = threads.to_vec();
        self
    }

    /// Sets the trial count.
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the profiler events.
    pub fn with_events(mut self, events: &[Metric]) -> Self {
        self.events = events.to_vec();
        self
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Keeps only the named workloads, in configured order.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::UnknownWorkload`] for a name that is not configured.
    pub fn retain_workloads<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ConfigurationError> {
        for name in names {
            let name = name.as_ref();
            if !self.workloads.iter().any(|w| w.name == name) {
                return Err(ConfigurationError::UnknownWorkload(name.to_string()));
            }
        }
        self.workloads
            .retain(|w| names.iter().any(|n| n.as_ref() == w.name));
        Ok(())
    }

    /// Checks the tables and freezes them into a [`SweepPlan`].
    pub fn validate(self) -> Result<SweepPlan, ConfigurationError> {
        SweepPlan::try_from(self)
    }

    fn check(&self) -> Result<(), ConfigurationError> {
        if self.workloads.is_empty() {
            return Err(ConfigurationError::NoWorkloads);
        }
        if self.sizes.is_empty() {
            return Err(ConfigurationError::NoSizes);
        }
        if self.trials == 0 {
            return Err(ConfigurationError::ZeroTrials);
        }
        check_threads(&self.threads)?;

        if self.events.is_empty() {
            return Err(ConfigurationError::NoEvents);
        }
        if let Some(metric) = self.events.iter().find(|m| !m.is_counter()) {
            return Err(ConfigurationError::NotAnEvent(metric.name().to_string()));
        }

        let mut sizes = HashSet::new();
        for size in &self.sizes {
            if !sizes.insert(size.as_str()) {
                return Err(ConfigurationError::DuplicateSize(size.clone()));
            }
        }

        let mut names = HashSet::new();
        for workload in &self.workloads {
            if !names.insert(workload.name.as_str()) {
                return Err(ConfigurationError::DuplicateWorkload(workload.name.clone()));
            }
            if let Some(size) = self.sizes.iter().find(|s| workload.param(s).is_none()) {
                return Err(ConfigurationError::UnknownSize {
                    workload: workload.name.clone(),
                    size: size.clone(),
                });
            }
        }

        Ok(())
    }
}

fn check_threads(threads: &[u32]) -> Result<(), ConfigurationError> {
    let first = *threads.first().ok_or(ConfigurationError::NoThreads)?;
    if threads.contains(&0) {
        return Err(ConfigurationError::ZeroThreads);
    }
    if first != 1 {
        return Err(ConfigurationError::BaselineNotFirst { first });
    }
    for pair in threads.windows(2) {
        if pair[1] <= pair[0] {
            return Err(ConfigurationError::ThreadsNotAscending {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// Validated sweep tables.
///
/// Guarantees: at least one workload, size and thread count; thread counts
/// strictly ascending from 1; at least one trial; every workload maps every
/// size label; events are all profiler counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    config: SweepConfig,
}

impl TryFrom<SweepConfig> for SweepPlan {
    type Error = ConfigurationError;

    fn try_from(config: SweepConfig) -> Result<Self, Self::Error> {
        config.check()?;
        Ok(Self { config })
    }
}

impl SweepPlan {
    /// The underlying tables.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Workloads in sweep order.
    pub fn workloads(&self) -> &[Workload] {
        &self.config.workloads
    }

    /// Size labels in sweep order.
    pub fn sizes(&self) -> &[String] {
        &self.config.sizes
    }

    /// Thread counts in sweep order; the first is always 1.
    pub fn threads(&self) -> &[u32] {
        &self.config.threads
    }

    /// Trials per configuration.
    pub fn trials(&self) -> u32 {
        self.config.trials
    }

    /// Profiler events.
    pub fn events(&self) -> &[Metric] {
        &self.config.events
    }

    /// Lifecycle command templates.
    pub fn suite(&self) -> &SuiteCommands {
        &self.config.suite
    }

    /// Failure policy.
    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    /// Configurations of one (workload, size) group, baseline first.
    pub fn group<'a>(
        &'a self,
        workload: &'a Workload,
        size: &'a str,
    ) -> impl Iterator<Item = Configuration> + 'a {
        // Every size is mapped; validated on construction.
        let param = workload.param(size).unwrap_or_default();
        self.threads()
            .iter()
            .map(move |&threads| Configuration::new(&workload.name, size, param, threads))
    }

    /// Every configuration of the sweep, in measurement order.
    pub fn configurations(&self) -> Vec<Configuration> {
        self.workloads()
            .iter()
            .flat_map(|w| self.sizes().iter().flat_map(move |s| self.group(w, s)))
            .collect()
    }

    /// Number of configurations (output rows of a complete sweep).
    pub fn configuration_count(&self) -> usize {
        self.workloads().len() * self.sizes().len() * self.threads().len()
    }

    /// Number of benchmark invocations of a complete sweep.
    pub fn trial_count(&self) -> u64 {
        self.configuration_count() as u64 * u64::from(self.trials())
    }
}
