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

//! Error types for dataset I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Dataset I/O error types.
///
/// # Examples
///
/// ```
/// use perfsweep_csv::CsvError;
///
/// let err = CsvError::Open {
///     path: "results.csv".into(),
///     message: "permission denied".to_string(),
/// };
/// assert_eq!(err.to_string(), "cannot open dataset 'results.csv': permission denied");
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    /// The dataset file could not be created or opened.
    #[error("cannot open dataset '{}': {message}", path.display())]
    Open {
        /// Dataset path.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// The dataset header does not match the expected columns.
    #[error("dataset header mismatch at column {position}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        /// Column position (0-based).
        position: usize,
        /// Expected column name.
        expected: String,
        /// Column name found in the file.
        found: String,
    },

    /// I/O error during reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the underlying CSV library.
    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),
}

/// Convenience type alias for `Result` with `CsvError`.
pub type Result<T> = std::result::Result<T, CsvError>;
