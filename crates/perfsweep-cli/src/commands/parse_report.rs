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

//! Parse-report command - inspect a saved profiler report

use super::read_file;
use crate::error::CliError;
use perfsweep_core::{parse_counter_report, parse_timing_report, MetricVector, TrialResult};
use std::path::Path;

/// Parse a counter report (and optionally the matching `time` output) and
/// print the metrics as a JSON object keyed by metric name.
///
/// # Errors
///
/// Returns `Err` if a file cannot be read or does not parse.
///
/// # Examples
///
/// ```no_run
/// use perfsweep_cli::commands::parse_report;
/// use std::path::Path;
///
/// # fn main() -> Result<(), perfsweep_cli::error::CliError> {
/// parse_report(Path::new("perf.csv"), Some(Path::new("time.txt")), true)?;
/// # Ok(())
/// # }
/// ```
pub fn parse_report(report: &Path, timing: Option<&Path>, pretty: bool) -> Result<(), CliError> {
    let metrics = load_metrics(report, timing)?;
    let json = if pretty {
        serde_json::to_string_pretty(&metrics)?
    } else {
        serde_json::to_string(&metrics)?
    };
    println!("{}", json);
    Ok(())
}

fn load_metrics(report: &Path, timing: Option<&Path>) -> Result<MetricVector, CliError> {
    let counters =
        parse_counter_report(&read_file(report)?).map_err(|e| CliError::report(report, e))?;
    match timing {
        Some(timing_path) => {
            let elapsed = parse_timing_report(&read_file(timing_path)?)
                .map_err(|e| CliError::report(timing_path, e))?;
            Ok(TrialResult::new(elapsed, counters).metrics())
        }
        None => Ok(counters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsweep_core::Metric;
    use perfsweep_test::{timing_text, PerfReport};
    use std::fs;

    #[test]
    fn test_load_metrics_with_timing() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("perf.csv");
        let timing = dir.path().join("time.txt");
        fs::write(&report, PerfReport::new().counter("cycles:u", 10.0).build()).unwrap();
        fs::write(&timing, timing_text(2.5)).unwrap();

        let metrics = load_metrics(&report, Some(&timing)).unwrap();
        assert_eq!(metrics.get(Metric::Cycles), Some(10.0));
        assert_eq!(metrics.get(Metric::RunTime), Some(2.5));
    }

    #[test]
    fn test_load_metrics_report_only() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("perf.csv");
        fs::write(&report, PerfReport::new().counter("cycles:u", 10.0).build()).unwrap();

        let metrics = load_metrics(&report, None).unwrap();
        assert_eq!(metrics.get(Metric::RunTime), None);
    }

    #[test]
    fn test_malformed_report_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("perf.csv");
        fs::write(&report, "# header\n\n12345\n").unwrap();

        let err = load_metrics(&report, None).unwrap_err();
        assert!(matches!(err, CliError::Report { .. }));
        assert!(err.to_string().contains("perf.csv"));
    }
}
