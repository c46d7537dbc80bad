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

//! Builders for profiler and timing output.

/// Builds a `perf stat -x,` report.
#[derive(Debug, Clone)]
pub struct PerfReport {
    lines: Vec<String>,
}

impl PerfReport {
    /// Starts a report with perf's two header lines.
    pub fn new() -> Self {
        Self {
            lines: vec![
                "# started on Mon Mar  4 10:00:00 2024".to_string(),
                String::new(),
            ],
        }
    }

    /// Adds a counter line without a derived ratio.
    pub fn counter(mut self, event: &str, value: f64) -> Self {
        self.lines
            .push(format!("{},,{},1000000,100.00,,", value, event));
        self
    }

    /// Adds a counter line carrying a derived ratio in the ratio field.
    pub fn with_ratio(mut self, event: &str, value: f64, ratio: f64) -> Self {
        self.lines
            .push(format!("{},,{},1000000,100.00,{},ratio", value, event, ratio));
        self
    }

    /// Adds a line verbatim.
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Renders the report.
    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl Default for PerfReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders what bash's `time` prints for `seconds` of wall-clock time.
pub fn timing_text(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - minutes * 60.0;
    format!(
        "\nreal\t{}m{}s\nuser\t0m0.000s\nsys\t0m0.000s\n",
        minutes as u64, rest
    )
}
