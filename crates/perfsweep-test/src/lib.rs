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

//! Shared test fixtures and fake collaborators for PerfSweep.
//!
//! # Quick Start
//!
//! ```rust
//! use perfsweep_test::{timing_text, PerfReport, ScriptedSuite};
//!
//! let report = PerfReport::new()
//!     .with_ratio("instructions:u", 100.0, 0.5)
//!     .counter("cycles:u", 200.0)
//!     .build();
//!
//! let suite = ScriptedSuite::new().with_default(timing_text(10.0), report);
//! ```

pub mod reports;
pub mod sinks;
pub mod suite;

pub use reports::{timing_text, PerfReport};
pub use sinks::FailingSink;
pub use suite::{ScriptedSuite, SuiteCall};

use perfsweep_core::{SweepConfig, SweepPlan, Workload};

/// A single-workload, single-size plan.
pub fn single_group_plan(workload: &str, threads: &[u32], trials: u32) -> SweepPlan {
    SweepConfig::new(["small"], vec![Workload::new(workload).with_param("small", 1)])
        .with_threads(threads)
        .with_trials(trials)
        .validate()
        .expect("fixture plan is valid")
}
