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

//! Error types for sweep configuration, profiler parsing, and external calls.
//!
//! The taxonomy has three families, each of which aborts the current
//! [`Configuration`](crate::Configuration) when raised:
//!
//! - [`FormatError`]: unparseable timing or counter output
//! - [`ExternalError`]: a benchmark lifecycle call failed
//! - [`ConfigurationError`]: the sweep tables are invalid
//!
//! [`SweepError`] wraps them with the workload or configuration that was
//! being processed when the failure happened.

use crate::config::Configuration;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Profiler or timing output that could not be parsed.
///
/// # Examples
///
/// ```
/// use perfsweep_core::FormatError;
///
/// let err = FormatError::FieldCount { line: 3, expected: 3, actual: 1 };
/// assert_eq!(
///     err.to_string(),
///     "counter report line 3: expected at least 3 fields, got 1"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// No line of the timing output carries the wall-clock marker.
    #[error("timing output has no 'real' wall-clock line")]
    MissingTimingLine,

    /// The wall-clock line was found but its duration is not `<m>m<s>s`.
    #[error("timing line {line}: invalid wall-clock duration '{value}'")]
    InvalidDuration {
        /// Line number in the timing output (1-based).
        line: usize,
        /// The offending duration text.
        value: String,
    },

    /// A counter report line has too few comma-separated fields.
    #[error("counter report line {line}: expected at least {expected} fields, got {actual}")]
    FieldCount {
        /// Line number in the report (1-based).
        line: usize,
        /// Minimum number of fields for this line.
        expected: usize,
        /// Number of fields found.
        actual: usize,
    },

    /// A numeric field holds something that is not a finite number.
    #[error("counter report line {line}: {field} field is not a number: '{value}'")]
    InvalidNumber {
        /// Line number in the report (1-based).
        line: usize,
        /// Which field failed (`value` or `ratio`).
        field: &'static str,
        /// The raw field text.
        value: String,
    },

    /// The report names a counter outside the known metric set.
    #[error("counter report line {line}: unknown counter '{name}'")]
    UnknownCounter {
        /// Line number in the report (1-based).
        line: usize,
        /// Event name after modifier stripping.
        name: String,
    },

    /// The wall-clock time is zero, below the timer's resolution.
    #[error("wall-clock time is zero; no speedup can be derived from it")]
    ZeroRunTime,

    /// The report ends before any counter line.
    #[error("counter report contains no counter lines")]
    EmptyReport,

    /// A trial reported a different metric set than the trials before it.
    #[error("trial reported metrics [{actual}] but earlier trials reported [{expected}]")]
    InconsistentCounters {
        /// Metric names reported by earlier trials.
        expected: String,
        /// Metric names reported by this trial.
        actual: String,
    },
}

/// A benchmark lifecycle call (build, run, uninstall) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    /// The command ran and exited unsuccessfully.
    #[error("'{command}' exited unsuccessfully ({status})")]
    NonZeroExit {
        /// The command line that was executed.
        command: String,
        /// Exit status description (code or signal).
        status: String,
    },

    /// The command could not be started.
    #[error("failed to launch '{command}': {message}")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// Underlying error message.
        message: String,
    },

    /// The command exceeded its time bound and was killed.
    #[error("'{command}' timed out after {timeout_secs} seconds")]
    TimedOut {
        /// The command line that was executed.
        command: String,
        /// Timeout in seconds.
        timeout_secs: u64,
    },

    /// The command succeeded but its output could not be collected.
    #[error("failed to read output '{path}': {message}")]
    Output {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
}

/// Invalid sweep tables, or a sweep step invoked out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No workloads configured.
    #[error("no workloads configured")]
    NoWorkloads,

    /// No problem sizes configured.
    #[error("no problem sizes configured")]
    NoSizes,

    /// No thread counts configured.
    #[error("no thread counts configured")]
    NoThreads,

    /// A thread count of zero was configured.
    #[error("thread counts must be positive")]
    ZeroThreads,

    /// The first thread count is not the single-thread baseline.
    #[error("thread counts must start at 1 (the speedup baseline), found {first}")]
    BaselineNotFirst {
        /// The first configured thread count.
        first: u32,
    },

    /// Thread counts are not strictly ascending.
    #[error("thread counts must be strictly ascending: {previous} is followed by {next}")]
    ThreadsNotAscending {
        /// Earlier thread count.
        previous: u32,
        /// The count that follows it.
        next: u32,
    },

    /// A trial count of zero was configured.
    #[error("trial count must be positive")]
    ZeroTrials,

    /// Two workloads share a name.
    #[error("workload '{0}' is configured more than once")]
    DuplicateWorkload(String),

    /// A problem size label is listed twice.
    #[error("problem size '{0}' is configured more than once")]
    DuplicateSize(String),

    /// A workload has no parameter for a configured size label.
    #[error("workload '{workload}' has no parameter for problem size '{size}'")]
    UnknownSize {
        /// Workload name.
        workload: String,
        /// Size label.
        size: String,
    },

    /// A workload name that is not in the configuration.
    #[error("unknown workload '{0}'")]
    UnknownWorkload(String),

    /// No profiler events configured.
    #[error("no profiler events configured")]
    NoEvents,

    /// A derived metric was requested as a profiler event.
    #[error("'{0}' is a derived metric, not a profiler event")]
    NotAnEvent(String),

    /// Speedup was requested before the group's baseline was finalized.
    #[error("no single-thread baseline for workload '{workload}', size '{size}' before {threads} threads")]
    MissingBaseline {
        /// Workload name.
        workload: String,
        /// Size label.
        size: String,
        /// Thread count that needed the baseline.
        threads: u32,
    },

    /// A baseline was built from a configuration that is not single-threaded.
    #[error("baseline must come from a single-thread configuration, got {threads} threads")]
    NotSingleThread {
        /// Thread count of the offending configuration.
        threads: u32,
    },

    /// Averages were requested before all trials were accumulated.
    #[error("finalized after {actual} trials, expected {expected}")]
    TrialCountMismatch {
        /// Trials the configuration requires.
        expected: u32,
        /// Trials actually accumulated.
        actual: u32,
    },
}

/// Failure of a single trial.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrialError {
    /// The trial's output could not be parsed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The benchmark run itself failed.
    #[error(transparent)]
    External(#[from] ExternalError),
}

/// Error that aborts (part of) a sweep.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    /// The sweep tables are invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Building a workload failed; none of its configurations ran.
    #[error("building workload '{workload}' failed: {source}")]
    Build {
        /// Workload name.
        workload: String,
        /// Underlying failure.
        #[source]
        source: ExternalError,
    },

    /// Uninstalling a workload failed after its sweep.
    #[error("uninstalling workload '{workload}' failed: {source}")]
    Uninstall {
        /// Workload name.
        workload: String,
        /// Underlying failure.
        #[source]
        source: ExternalError,
    },

    /// One trial of a configuration failed; the configuration has no row.
    #[error("{configuration}, trial {trial}: {source}")]
    Trial {
        /// The configuration being measured.
        configuration: Configuration,
        /// Trial index (1-based).
        trial: u32,
        /// Underlying failure.
        #[source]
        source: TrialError,
    },

    /// Averaging or speedup derivation failed for a configuration.
    #[error("{configuration}: {source}")]
    Finalize {
        /// The configuration being finalized.
        configuration: Configuration,
        /// Underlying failure.
        #[source]
        source: ConfigurationError,
    },

    /// The finalized row could not be written.
    #[error("{configuration}: writing row failed: {message}")]
    Output {
        /// The configuration whose row was lost.
        configuration: Configuration,
        /// Underlying error message.
        message: String,
    },
}

impl SweepError {
    /// Returns the configuration this error is attributed to, if any.
    pub fn configuration(&self) -> Option<&Configuration> {
        match self {
            SweepError::Trial { configuration, .. }
            | SweepError::Finalize { configuration, .. }
            | SweepError::Output { configuration, .. } => Some(configuration),
            _ => None,
        }
    }

    /// Returns true for failures caused by unparseable profiler output.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SweepError::Trial {
                source: TrialError::Format(_),
                ..
            }
        )
    }
}
