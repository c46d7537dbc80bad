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

//! Row sinks with controlled failures.

use perfsweep_core::{OutputRow, RowSink};
use std::fmt;

/// Error of [`FailingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkFull;

impl fmt::Display for SinkFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sink rejected the row")
    }
}

/// Accepts a fixed number of rows, then fails every write.
#[derive(Debug, Default)]
pub struct FailingSink {
    capacity: usize,
    /// Rows accepted so far.
    pub rows: Vec<OutputRow>,
}

impl FailingSink {
    /// Creates a sink that accepts `capacity` rows.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rows: Vec::new(),
        }
    }
}

impl RowSink for FailingSink {
    type Error = SinkFull;

    fn write_row(&mut self, row: &OutputRow) -> Result<(), Self::Error> {
        if self.rows.len() >= self.capacity {
            return Err(SinkFull);
        }
        self.rows.push(row.clone());
        Ok(())
    }
}
