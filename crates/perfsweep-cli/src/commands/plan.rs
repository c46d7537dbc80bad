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

//! Plan command - validate a configuration without running it

use crate::config::{load_config, ConfigSource, Overrides};
use crate::error::CliError;
use crate::suite::ProcessSuite;
use colored::Colorize;

/// Validate the sweep tables and print every configuration a run would
/// measure, in visit order.
///
/// # Output
///
/// ```text
/// ✓ 6 workload(s), 3 size(s), 6 thread count(s), 5 trial(s)
///   Configurations: 108
///   Trials: 540
///   workload 'radixsort', size 'small' (4194304), 1 thread
///   ...
/// ```
pub fn plan(source: ConfigSource<'_>, overrides: &Overrides) -> Result<(), CliError> {
    let plan = overrides.apply(load_config(source)?)?;
    // every workload needs a run command
    ProcessSuite::from_plan(&plan)?;

    println!(
        "{} {} workload(s), {} size(s), {} thread count(s), {} trial(s)",
        "✓".green().bold(),
        plan.workloads().len(),
        plan.sizes().len(),
        plan.threads().len(),
        plan.trials()
    );
    println!("  Configurations: {}", plan.configuration_count());
    println!("  Trials: {}", plan.trial_count());
    println!("  Events: {}", plan.events().iter().map(|m| m.name()).collect::<Vec<_>>().join(","));
    for configuration in plan.configurations() {
        println!("  {}", configuration);
    }
    Ok(())
}
