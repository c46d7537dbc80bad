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

//! Wall-clock timing extraction.
//!
//! The timing text is whatever the shell's `time` keyword wrote, possibly
//! interleaved with the benchmark's own diagnostics:
//!
//! ```text
//! real	1m2.250s
//! user	3m57.101s
//! sys	0m0.412s
//! ```
//!
//! Only the `real` line matters. Benchmarks that print their own `real`
//! lines write them before the enclosing `time` reports, so the last
//! marker line wins.

use crate::error::FormatError;

/// First token of the wall-clock line.
pub const WALL_CLOCK_MARKER: &str = "real";

/// Extracts elapsed wall-clock seconds from timing output.
///
/// # Errors
///
/// [`FormatError::MissingTimingLine`] if no line starts with `real`,
/// [`FormatError::InvalidDuration`] if its duration is not `<int>m<float>s`.
///
/// # Examples
///
/// ```
/// use perfsweep_core::parse_timing_report;
///
/// let secs = parse_timing_report("\nreal\t1m2.5s\nuser\t0m1.0s\n").unwrap();
/// assert!((secs - 62.5).abs() < 1e-9);
/// ```
pub fn parse_timing_report(text: &str) -> Result<f64, FormatError> {
    parse_elapsed(text.lines())
}

/// Line-oriented form of [`parse_timing_report`].
pub fn parse_elapsed<'a, I>(lines: I) -> Result<f64, FormatError>
where
    I: IntoIterator<Item = &'a str>,
{
    let (line_no, value) = lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some(WALL_CLOCK_MARKER) => Some((i + 1, tokens.next().unwrap_or(""))),
                _ => None,
            }
        })
        .last()
        .ok_or(FormatError::MissingTimingLine)?;

    parse_duration(value).ok_or_else(|| FormatError::InvalidDuration {
        line: line_no,
        value: value.to_string(),
    })
}

/// Parses a `<minutes>m<seconds>s` duration into seconds.
///
/// Minutes are a non-negative integer, seconds a non-negative decimal.
pub fn parse_duration(value: &str) -> Option<f64> {
    let (minutes, rest) = value.split_once('m')?;
    let seconds = rest.strip_suffix('s')?;

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    Some(minutes as f64 * 60.0 + seconds)
}
