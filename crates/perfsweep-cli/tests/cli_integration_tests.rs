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

//! CLI integration tests

use assert_cmd::Command;
use perfsweep_test::{timing_text, PerfReport};
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

fn perfsweep_cmd() -> Command {
    Command::cargo_bin("perfsweep").expect("Failed to find perfsweep binary")
}

fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write temp file");
    file
}

// ===== Help and Version Tests =====

#[test]
fn test_help_output() {
    perfsweep_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parallel scaling measurement sweeps"))
        .stdout(predicate::str::contains("parse-report"));
}

#[test]
fn test_version_output() {
    perfsweep_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("perfsweep"));
}

#[test]
fn test_no_subcommand_fails() {
    perfsweep_cmd().assert().failure();
}

// ===== Presets and Plan Tests =====

#[test]
fn test_presets_listed() {
    perfsweep_cmd()
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("parsec"))
        .stdout(predicate::str::contains("splash"))
        .stdout(predicate::str::contains("simsmall, simmedium, simlarge"));
}

#[test]
fn test_plan_preset_with_overrides() {
    perfsweep_cmd()
        .args(["plan", "--preset", "splash", "--threads", "1,2", "--trials", "3", "-w", "fft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configurations: 6"))
        .stdout(predicate::str::contains("Trials: 18"))
        .stdout(predicate::str::contains("workload 'fft', size 'large' (24), 2 threads"));
}

#[test]
fn test_plan_rejects_thread_list_without_baseline() {
    perfsweep_cmd()
        .args(["plan", "--preset", "parsec", "--threads", "2,4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_plan_unknown_preset() {
    perfsweep_cmd()
        .args(["plan", "--preset", "spec2017"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset 'spec2017'"));
}

#[test]
fn test_plan_unknown_workload() {
    perfsweep_cmd()
        .args(["plan", "--preset", "splash", "--workload", "barnes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("barnes"));
}

#[test]
fn test_plan_requires_a_source() {
    perfsweep_cmd().arg("plan").assert().failure();
}

#[test]
fn test_plan_from_yaml_config() {
    let config = create_temp_file(
        "sizes: [small]\nthreads: [1, 4]\ntrials: 2\nsuite:\n  run: ./bench -t {threads} -n {param}\nworkloads:\n  - name: bench\n    params: {small: 100}\n",
        ".yaml",
    );
    perfsweep_cmd()
        .arg("plan")
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configurations: 2"))
        .stdout(predicate::str::contains("workload 'bench', size 'small' (100), 4 threads"));
}

#[test]
fn test_plan_config_without_run_command() {
    let config = create_temp_file(
        r#"{"sizes": ["small"], "workloads": [{"name": "bench", "params": {"small": 1}}]}"#,
        ".json",
    );
    perfsweep_cmd()
        .arg("plan")
        .arg("-c")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("workload 'bench' has no run command"));
}

// ===== Parse Report Tests =====

#[test]
fn test_parse_report_json() {
    let report = create_temp_file(
        &PerfReport::new()
            .with_ratio("instructions:u", 100.0, 0.5)
            .counter("cycles:u", 200.0)
            .build(),
        ".csv",
    );
    let timing = create_temp_file(&timing_text(1.5), ".txt");

    let output = perfsweep_cmd()
        .arg("parse-report")
        .arg(report.path())
        .arg("--timing")
        .arg(timing.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["instructions"], 100.0);
    assert_eq!(json["ipc"], 0.5);
    assert_eq!(json["cycles"], 200.0);
    assert_eq!(json["run-time"], 1.5);
    assert!(json.get("branch-misses").is_none());
}

#[test]
fn test_parse_report_malformed() {
    let report = create_temp_file("# started\n\n100,\n", ".csv");
    perfsweep_cmd()
        .arg("parse-report")
        .arg(report.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_parse_report_missing_file() {
    perfsweep_cmd()
        .args(["parse-report", "/nonexistent/perf.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

// ===== Run Tests =====

#[cfg(unix)]
mod run {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// A stand-in `perf` that runs the command and writes a fixed report.
    const FAKE_PERF: &str = r#"#!/bin/bash
out=""
while [ "$1" != "--" ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
shift
"$@" || exit $?
printf '# started on test\n\n100,,instructions:u,1000,100.00,0.5,insn per cycle\n200,,cycles:u,1000,100.00,,\n' > "$out"
"#;

    fn fake_path(dir: &Path) -> String {
        let perf = dir.join("perf");
        fs::write(&perf, FAKE_PERF).unwrap();
        fs::set_permissions(&perf, fs::Permissions::from_mode(0o755)).unwrap();
        format!("{}:{}", dir.display(), std::env::var("PATH").unwrap_or_default())
    }

    #[test]
    fn test_run_writes_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.csv");
        let config = dir.path().join("sweep.yaml");
        fs::write(
            &config,
            "sizes: [small]\nthreads: [1, 2]\ntrials: 2\nevents: [instructions, cycles]\nsuite:\n  build: touch built-{workload}\n  run: sleep 0.1\n  uninstall: rm built-{workload}\nworkloads:\n  - name: nap\n    params: {small: 1}\n",
        )
        .unwrap();

        perfsweep_cmd()
            .env("PATH", fake_path(dir.path()))
            .arg("run")
            .arg("--config")
            .arg(&config)
            .arg("--output")
            .arg(&output)
            .arg("--suite-dir")
            .arg(dir.path())
            .arg("--timeout")
            .arg("30")
            .assert()
            .success()
            .stdout(predicate::str::contains("Rows: 2"))
            .stdout(predicate::str::contains("Trials: 4"));

        let records = perfsweep_csv::read_dataset(&output).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].threads, 1);
        assert_eq!(records[0].speedup, 1.0);
        assert_eq!(records[1].instructions, 100.0);
        assert_eq!(records[1].ipc, 0.5);
        assert!(records[1].run_time > 0.0);
        assert!(!dir.path().join("built-nap").exists());
    }

    #[test]
    fn test_run_keep_going_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.csv");
        let config = dir.path().join("sweep.yaml");
        fs::write(
            &config,
            "sizes: [small]\nthreads: [1]\ntrials: 1\nworkloads:\n  - name: broken\n    params: {small: 1}\n    run: exit 2\n  - name: fine\n    params: {small: 1}\n    run: sleep 0.1\n",
        )
        .unwrap();

        perfsweep_cmd()
            .env("PATH", fake_path(dir.path()))
            .arg("run")
            .arg("--config")
            .arg(&config)
            .arg("--output")
            .arg(&output)
            .arg("--keep-going")
            .assert()
            .failure()
            .stdout(predicate::str::contains("broken"))
            .stderr(predicate::str::contains("1 workload(s) failed"));

        let records = perfsweep_csv::read_dataset(&output).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].workload, "fine");
    }
}
