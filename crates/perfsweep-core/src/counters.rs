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

//! Counter-report parsing.
//!
//! Reads the comma-separated report written by `perf stat -x, -o <file>`:
//!
//! ```text
//! # started on Mon Mar  4 10:00:00 2024
//!
//! 4123.55,msec,cpu-clock:u,4123550000,100.00,3.968,CPUs utilized
//! 9812734512,,instructions:u,4123550000,100.00,1.21,insn per cycle
//! 8099315321,,cycles:u,4123550000,100.00,,
//! ```
//!
//! Field 0 is the counter value, field 2 the event name (with an optional
//! `:modifier` suffix), field 5 the ratio perf derives for some events.

use crate::error::FormatError;
use crate::metrics::{Metric, MetricVector};

/// Leading lines of the report (start timestamp and a blank line).
pub const HEADER_LINES: usize = 2;

/// Field holding the counter value.
pub const VALUE_FIELD: usize = 0;

/// Field holding the event name.
pub const EVENT_FIELD: usize = 2;

/// Field holding the derived ratio.
pub const RATIO_FIELD: usize = 5;

const SEPARATOR: char = ',';
const MODIFIER_SEPARATOR: char = ':';

/// One parsed data line of a counter report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterLine {
    /// The counter this line reports.
    pub metric: Metric,
    /// The counter value.
    pub value: f64,
    /// The derived ratio carried by this line, for `instructions`,
    /// `cache-misses` and `branch-misses`.
    pub ratio: Option<(Metric, f64)>,
}

/// Removes the privilege-level modifier from an event name.
///
/// ```
/// use perfsweep_core::counters::strip_modifier;
///
/// assert_eq!(strip_modifier("instructions:u"), "instructions");
/// assert_eq!(strip_modifier("cycles"), "cycles");
/// ```
pub fn strip_modifier(event: &str) -> &str {
    let name = match event.split_once(MODIFIER_SEPARATOR) {
        Some((name, _)) => name,
        None => event,
    };
    name.trim()
}

/// Parses one data line. `line_no` is 1-based and only used for errors.
pub fn parse_counter_line(line_no: usize, line: &str) -> Result<CounterLine, FormatError> {
    let fields: Vec<&str> = line.trim_end().split(SEPARATOR).collect();
    if fields.len() <= EVENT_FIELD {
        return Err(FormatError::FieldCount {
            line: line_no,
            expected: EVENT_FIELD + 1,
            actual: fields.len(),
        });
    }

    let name = strip_modifier(fields[EVENT_FIELD]);
    let metric = Metric::from_counter_name(name).ok_or_else(|| FormatError::UnknownCounter {
        line: line_no,
        name: name.to_string(),
    })?;
    let value = parse_number(line_no, "value", fields[VALUE_FIELD])?;

    let ratio = match Metric::derived_for_event(name) {
        Some(derived) => {
            let raw = fields.get(RATIO_FIELD).ok_or(FormatError::FieldCount {
                line: line_no,
                expected: RATIO_FIELD + 1,
                actual: fields.len(),
            })?;
            Some((derived, parse_number(line_no, "ratio", raw)?))
        }
        None => None,
    };

    Ok(CounterLine {
        metric,
        value,
        ratio,
    })
}

/// Parses a whole report into per-metric sums for one trial.
///
/// Counters reported on several lines (duplicate events) are summed, and so
/// are their ratios. A ratio metric is present only if its triggering
/// counter line is.
///
/// # Errors
///
/// Any malformed data line aborts the parse; a report with no data lines is
/// [`FormatError::EmptyReport`].
pub fn parse_counter_report(report: &str) -> Result<MetricVector, FormatError> {
    let mut counters = MetricVector::new();

    for (i, line) in report.lines().enumerate().skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = parse_counter_line(i + 1, line)?;
        counters.add(parsed.metric, parsed.value);
        if let Some((derived, ratio)) = parsed.ratio {
            counters.add(derived, ratio);
        }
    }

    if counters.is_empty() {
        return Err(FormatError::EmptyReport);
    }
    Ok(counters)
}

fn parse_number(line_no: usize, field: &'static str, raw: &str) -> Result<f64, FormatError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormatError::InvalidNumber {
            line: line_no,
            field,
            value: trimmed.to_string(),
        })
}
