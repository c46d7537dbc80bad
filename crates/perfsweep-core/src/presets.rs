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

//! Built-in sweep tables for the PARSEC 3.0 and Splash-3 suites.

use crate::config::{
    SuiteCommands, SweepConfig, TimingSource, Workload, DEFAULT_THREADS, DEFAULT_TRIALS,
};

/// A named, ready-to-run sweep configuration.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Name used to select the preset.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    build: fn() -> SweepConfig,
}

impl Preset {
    /// Builds the preset's configuration.
    pub fn config(&self) -> SweepConfig {
        (self.build)()
    }
}

/// All built-in presets.
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "parsec",
        description: "PARSEC 3.0 via parsecmgmt, simsmall..simlarge inputs (run from the PARSEC root)",
        build: parsec,
    },
    Preset {
        name: "splash",
        description: "Splash-3 kernels and apps with numeric problem sizes (run from Splash3/codes)",
        build: splash,
    },
];

/// Looks up a preset by name.
pub fn preset(name: &str) -> Option<Preset> {
    PRESETS.iter().copied().find(|p| p.name == name)
}

const PARSEC_WORKLOADS: &[&str] = &[
    "blackscholes",
    "bodytrack",
    "canneal",
    "facesim",
    "ferret",
    "fluidanimate",
    "streamcluster",
    "swaptions",
    "vips",
    "x264",
];

// parsecmgmt takes the input label itself; the parameter is the input's rank.
const PARSEC_SIZES: &[(&str, u64)] = &[("simsmall", 1), ("simmedium", 2), ("simlarge", 3)];

/// PARSEC 3.0: every workload is built, swept and fully uninstalled in turn.
pub fn parsec() -> SweepConfig {
    let workloads = PARSEC_WORKLOADS
        .iter()
        .map(|name| {
            PARSEC_SIZES
                .iter()
                .fold(Workload::new(*name), |w, (size, param)| w.with_param(*size, *param))
        })
        .collect();

    SweepConfig::new(PARSEC_SIZES.iter().map(|(size, _)| *size), workloads)
        .with_suite(SuiteCommands {
            build: Some("./parsecmgmt -a build -p {workload}".to_string()),
            run: Some("./parsecmgmt -a run -p {workload} -n {threads} -i {size}".to_string()),
            uninstall: Some("./parsecmgmt -a fulluninstall -p {workload}".to_string()),
            timing: TimingSource::Stdout,
        })
        .with_threads(DEFAULT_THREADS)
        .with_trials(DEFAULT_TRIALS)
}

/// Splash-3: binaries are prebuilt, each workload has its own command line.
pub fn splash() -> SweepConfig {
    let grid = |small, medium, large| [("small", small), ("medium", medium), ("large", large)];
    let table: [(&str, [(&str, u64); 3], &str); 6] = [
        (
            "radixsort",
            grid(4_194_304, 16_777_216, 67_108_864),
            "kernels/radix/./RADIX -p{threads} -n{param}",
        ),
        (
            "lu_contig",
            grid(512, 1024, 2048),
            "kernels/lu/contiguous_blocks/./LU -p{threads} -n{param}",
        ),
        (
            "lu_noncontig",
            grid(512, 1024, 2048),
            "kernels/lu/non_contiguous_blocks/./LU -p{threads} -n{param}",
        ),
        ("fft", grid(20, 22, 24), "kernels/fft/./FFT -p{threads} -m{param}"),
        (
            "ocean_contig",
            grid(514, 1026, 2050),
            "apps/ocean/contiguous_partitions/./OCEAN -p{threads} -n{param}",
        ),
        (
            "ocean_noncontig",
            grid(514, 1026, 2050),
            "apps/ocean/non_contiguous_partitions/./OCEAN -p{threads} -n{param}",
        ),
    ];

    let workloads = table
        .into_iter()
        .map(|(name, sizes, run)| {
            sizes
                .into_iter()
                .fold(Workload::new(name).with_run(run), |w, (size, param)| {
                    w.with_param(size, param)
                })
        })
        .collect();

    SweepConfig::new(["small", "medium", "large"], workloads)
        .with_threads(DEFAULT_THREADS)
        .with_trials(DEFAULT_TRIALS)
}
