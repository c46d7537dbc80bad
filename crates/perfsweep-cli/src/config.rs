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

//! Sweep configuration loading and command-line overrides.

use crate::error::CliError;
use perfsweep_core::{preset, FailurePolicy, SweepConfig, SweepPlan};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Where the sweep tables come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource<'a> {
    /// A built-in preset, by name.
    Preset(&'a str),
    /// A YAML or JSON file; `.json` selects JSON.
    File(&'a Path),
}

/// Loads the raw sweep tables.
pub fn load_config(source: ConfigSource<'_>) -> Result<SweepConfig, CliError> {
    match source {
        ConfigSource::Preset(name) => preset(name)
            .map(|p| p.config())
            .ok_or_else(|| CliError::UnknownPreset(name.to_string())),
        ConfigSource::File(path) => {
            let content = fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?;
            let is_json = path
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
            debug!(path = %path.display(), json = is_json, "loading configuration");
            if is_json {
                serde_json::from_str(&content).map_err(|e| CliError::config_file(path, e))
            } else {
                serde_yaml::from_str(&content).map_err(|e| CliError::config_file(path, e))
            }
        }
    }
}

/// Command-line adjustments applied on top of the loaded tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replacement thread counts.
    pub threads: Option<Vec<u32>>,
    /// Replacement trial count.
    pub trials: Option<u32>,
    /// Workloads to keep; empty keeps all.
    pub workloads: Vec<String>,
    /// Skip failing workloads instead of aborting.
    pub keep_going: bool,
}

impl Overrides {
    /// Applies the overrides and validates the result.
    pub fn apply(&self, mut config: SweepConfig) -> Result<SweepPlan, CliError> {
        if let Some(threads) = &self.threads {
            config = config.with_threads(threads);
        }
        if let Some(trials) = self.trials {
            config = config.with_trials(trials);
        }
        if !self.workloads.is_empty() {
            config.retain_workloads(&self.workloads)?;
        }
        if self.keep_going {
            config = config.with_failure_policy(FailurePolicy::SkipWorkload);
        }
        Ok(config.validate()?)
    }
}
