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

//! A scripted [`BenchmarkSuite`] that records every call.

use perfsweep_core::{BenchmarkSuite, Configuration, ExternalError, TrialOutput, Workload};
use std::collections::{HashMap, HashSet, VecDeque};

type Key = (String, String, u32);

/// One lifecycle call observed by [`ScriptedSuite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteCall {
    /// `build(workload)`.
    Build(String),
    /// `run(configuration)`.
    Run(Configuration),
    /// `uninstall(workload)`.
    Uninstall(String),
}

/// Fake suite returning canned trial outputs.
///
/// Outputs queued for a (workload, size, threads) key are returned in order,
/// one per trial; once a queue is empty the default output is used.
#[derive(Debug, Default)]
pub struct ScriptedSuite {
    queued: HashMap<Key, VecDeque<Result<TrialOutput, ExternalError>>>,
    default: Option<TrialOutput>,
    failing_builds: HashSet<String>,
    failing_uninstalls: HashSet<String>,
    calls: Vec<SuiteCall>,
}

impl ScriptedSuite {
    /// Creates a suite with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Output returned when nothing is queued for a configuration.
    pub fn with_default(mut self, timing_text: impl Into<String>, report: impl Into<String>) -> Self {
        self.default = Some(TrialOutput::new(timing_text, report));
        self
    }

    /// Queues the output of the next trial of a configuration.
    pub fn with_trial(
        mut self,
        workload: &str,
        size: &str,
        threads: u32,
        timing_text: impl Into<String>,
        report: impl Into<String>,
    ) -> Self {
        self.queue(workload, size, threads)
            .push_back(Ok(TrialOutput::new(timing_text, report)));
        self
    }

    /// Queues a failing trial for a configuration.
    pub fn with_run_failure(mut self, workload: &str, size: &str, threads: u32) -> Self {
        let command = format!("run {} {} {}", workload, size, threads);
        self.queue(workload, size, threads)
            .push_back(Err(ExternalError::NonZeroExit {
                command,
                status: "exit status: 1".to_string(),
            }));
        self
    }

    /// Makes `build` fail for a workload.
    pub fn with_build_failure(mut self, workload: &str) -> Self {
        self.failing_builds.insert(workload.to_string());
        self
    }

    /// Makes `uninstall` fail for a workload.
    pub fn with_uninstall_failure(mut self, workload: &str) -> Self {
        self.failing_uninstalls.insert(workload.to_string());
        self
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> &[SuiteCall] {
        &self.calls
    }

    /// Thread counts of the observed `run` calls, in order.
    pub fn run_threads(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SuiteCall::Run(configuration) => Some(configuration.threads),
                _ => None,
            })
            .collect()
    }

    fn queue(&mut self, workload: &str, size: &str, threads: u32) -> &mut VecDeque<Result<TrialOutput, ExternalError>> {
        self.queued
            .entry((workload.to_string(), size.to_string(), threads))
            .or_default()
    }

    fn lifecycle(&self, action: &str, workload: &Workload, failing: &HashSet<String>) -> Result<(), ExternalError> {
        if failing.contains(&workload.name) {
            return Err(ExternalError::NonZeroExit {
                command: format!("{} {}", action, workload.name),
                status: "exit status: 2".to_string(),
            });
        }
        Ok(())
    }
}

impl BenchmarkSuite for ScriptedSuite {
    fn build(&mut self, workload: &Workload) -> Result<(), ExternalError> {
        self.calls.push(SuiteCall::Build(workload.name.clone()));
        self.lifecycle("build", workload, &self.failing_builds)
    }

    fn run(&mut self, configuration: &Configuration) -> Result<TrialOutput, ExternalError> {
        self.calls.push(SuiteCall::Run(configuration.clone()));
        let key = (
            configuration.workload.clone(),
            configuration.size.clone(),
            configuration.threads,
        );
        if let Some(next) = self.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return next;
        }
        self.default.clone().ok_or_else(|| ExternalError::Spawn {
            command: format!("run {}", configuration),
            message: "no scripted output".to_string(),
        })
    }

    fn uninstall(&mut self, workload: &Workload) -> Result<(), ExternalError> {
        self.calls.push(SuiteCall::Uninstall(workload.name.clone()));
        self.lifecycle("uninstall", workload, &self.failing_uninstalls)
    }
}
