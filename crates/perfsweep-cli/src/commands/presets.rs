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

//! Presets command - list built-in sweep tables

use crate::error::CliError;
use colored::Colorize;
use perfsweep_core::PRESETS;

/// Print every built-in preset with its size labels and workload count.
pub fn presets() -> Result<(), CliError> {
    for preset in PRESETS {
        let config = preset.config();
        println!("{}", preset.name.bold());
        println!("  {}", preset.description);
        println!("  Workloads: {}", config.workloads.len());
        println!("  Sizes: {}", config.sizes.join(", "));
    }
    Ok(())
}
