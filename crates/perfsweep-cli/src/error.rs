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

//! Structured error types for the PerfSweep CLI.
//!
//! All command handlers return `Result<T, CliError>`; `main` prints the
//! error and exits non-zero.

use perfsweep_core::{ConfigurationError, SweepError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for PerfSweep CLI operations.
///
/// # Examples
///
/// ```rust,no_run
/// use perfsweep_cli::error::CliError;
///
/// fn read_report(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file read or write).
    #[error("I/O error for '{}': {message}", path.display())]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A configuration file could not be deserialized.
    #[error("invalid configuration file '{}': {message}", path.display())]
    ConfigFile {
        /// The configuration file
        path: PathBuf,
        /// The deserializer's message
        message: String,
    },

    /// No built-in preset has this name.
    #[error("unknown preset '{0}' (see `perfsweep presets`)")]
    UnknownPreset(String),

    /// A workload has no run command, from itself or the suite.
    #[error("workload '{0}' has no run command")]
    MissingRunCommand(String),

    /// The sweep tables are invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The sweep stopped on a failure.
    #[error(transparent)]
    Sweep(#[from] SweepError),

    /// The sweep finished but skipped failing workloads.
    #[error("sweep incomplete: {failed} workload(s) failed")]
    Incomplete {
        /// Number of skipped workloads
        failed: usize,
    },

    /// The dataset could not be opened or written.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// A saved profiler report or timing file could not be parsed.
    #[error("cannot parse '{}': {message}", path.display())]
    Report {
        /// The offending file
        path: PathBuf,
        /// The parser's message
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a configuration file error.
    pub fn config_file(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ConfigFile {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a report parsing error.
    pub fn report(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Report {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<perfsweep_csv::CsvError> for CliError {
    fn from(err: perfsweep_csv::CsvError) -> Self {
        Self::Dataset(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: err.to_string(),
        }
    }
}
