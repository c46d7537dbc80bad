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

//! End-to-end sweep scenarios against a scripted suite.

use perfsweep_core::{
    run_sweep, ConfigurationError, FailurePolicy, FormatError, Metric, OutputRow, SweepConfig,
    SweepError, TrialError, Workload,
};
use perfsweep_test::{
    single_group_plan, timing_text, FailingSink, PerfReport, ScriptedSuite, SuiteCall,
};

fn ipc_report() -> String {
    PerfReport::new()
        .with_ratio("instructions:u", 100.0, 0.5)
        .build()
}

#[test]
fn test_two_thread_counts_single_trial() {
    let plan = single_group_plan("A", &[1, 2], 1);
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, timing_text(10.0), ipc_report())
        .with_trial("A", "small", 2, timing_text(4.0), ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    run_sweep(&plan, &mut suite, &mut rows).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].configuration.threads, 1);
    assert_eq!(rows[0].metrics.get(Metric::Ipc), Some(0.5));
    assert_eq!(rows[0].speedup, 1.0);
    assert_eq!(rows[1].configuration.threads, 2);
    assert_eq!(rows[1].metrics.get(Metric::Ipc), Some(0.5));
    assert_eq!(rows[1].speedup, 2.5);
}

#[test]
fn test_baseline_is_average_of_single_thread_trials() {
    let plan = single_group_plan("A", &[1, 2], 2);
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, timing_text(10.0), ipc_report())
        .with_trial("A", "small", 1, timing_text(20.0), ipc_report())
        .with_trial("A", "small", 2, timing_text(5.0), ipc_report())
        .with_trial("A", "small", 2, timing_text(7.5), ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    run_sweep(&plan, &mut suite, &mut rows).unwrap();

    assert_eq!(rows[0].metrics.run_time(), 15.0);
    assert_eq!(rows[0].baseline_secs, 15.0);
    assert_eq!(rows[1].metrics.run_time(), 6.25);
    assert_eq!(rows[1].baseline_secs, 15.0);
    assert_eq!(rows[1].speedup, 2.4);
}

#[test]
fn test_speedup_is_one_for_every_baseline() {
    let config = SweepConfig::new(
        ["small", "large"],
        vec![
            Workload::new("fft").with_param("small", 20).with_param("large", 24),
            Workload::new("lu").with_param("small", 512).with_param("large", 2048),
        ],
    )
    .with_threads(&[1, 4, 16])
    .with_trials(3);
    let plan = config.validate().unwrap();
    let mut suite = ScriptedSuite::new().with_default(timing_text(3.3), ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    let summary = run_sweep(&plan, &mut suite, &mut rows).unwrap();

    assert_eq!(summary.rows_written, 12);
    assert_eq!(summary.trials_run, 36);
    assert_eq!(summary.workloads_completed, 2);
    for row in rows.iter().filter(|r| r.configuration.threads == 1) {
        assert_eq!(row.speedup, 1.0, "{}", row.configuration);
    }
}

#[test]
fn test_baselines_reset_per_group() {
    let config = SweepConfig::new(
        ["small", "large"],
        vec![Workload::new("A").with_param("small", 1).with_param("large", 2)],
    )
    .with_threads(&[1, 2])
    .with_trials(1);
    let plan = config.validate().unwrap();
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, timing_text(8.0), ipc_report())
        .with_trial("A", "small", 2, timing_text(4.0), ipc_report())
        .with_trial("A", "large", 1, timing_text(30.0), ipc_report())
        .with_trial("A", "large", 2, timing_text(10.0), ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    run_sweep(&plan, &mut suite, &mut rows).unwrap();

    let speedups: Vec<f64> = rows.iter().map(|r| r.speedup).collect();
    assert_eq!(speedups, vec![1.0, 2.0, 1.0, 3.0]);
    assert_eq!(rows[3].baseline_secs, 30.0);
}

#[test]
fn test_thread_counts_visited_baseline_first() {
    let plan = single_group_plan("A", &[1, 2, 4, 8], 2);
    let mut suite = ScriptedSuite::new().with_default(timing_text(1.0), ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    run_sweep(&plan, &mut suite, &mut rows).unwrap();

    assert_eq!(suite.run_threads(), vec![1, 1, 2, 2, 4, 4, 8, 8]);
    assert_eq!(suite.calls().first(), Some(&SuiteCall::Build("A".to_string())));
    assert_eq!(
        suite.calls().last(),
        Some(&SuiteCall::Uninstall("A".to_string()))
    );
}

#[test]
fn test_out_of_order_threads_rejected_before_running() {
    let err = SweepConfig::new(["small"], vec![Workload::new("A").with_param("small", 1)])
        .with_threads(&[2, 1])
        .validate()
        .unwrap_err();
    assert_eq!(err, ConfigurationError::BaselineNotFirst { first: 2 });
}

#[test]
fn test_malformed_line_aborts_configuration_keeps_earlier_rows() {
    let plan = single_group_plan("A", &[1, 2, 4], 1);
    let broken = PerfReport::new().raw("100,").build();
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, timing_text(10.0), ipc_report())
        .with_trial("A", "small", 2, timing_text(5.0), broken);
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();

    assert!(err.is_format_error());
    match err {
        SweepError::Trial {
            configuration,
            trial,
            source: TrialError::Format(FormatError::FieldCount { .. }),
        } => {
            assert_eq!(configuration.threads, 2);
            assert_eq!(trial, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].configuration.threads, 1);
    assert_eq!(suite.run_threads(), vec![1, 2]);
}

#[test]
fn test_missing_timing_line_is_not_averaged() {
    let plan = single_group_plan("A", &[1], 2);
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, timing_text(10.0), ipc_report())
        .with_trial("A", "small", 1, "user\t0m1.0s\n", ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Trial {
            trial: 2,
            source: TrialError::Format(FormatError::MissingTimingLine),
            ..
        }
    ));
    assert!(rows.is_empty());
}

#[test]
fn test_zero_run_time_aborts_before_any_speedup() {
    let plan = single_group_plan("A", &[1, 2], 1);
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, "real\t0m0.000s\n", ipc_report())
        .with_trial("A", "small", 2, "real\t0m0.001s\n", ipc_report());
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Trial {
            trial: 1,
            source: TrialError::Format(FormatError::ZeroRunTime),
            ..
        }
    ));
    assert_eq!(err.configuration().map(|c| c.threads), Some(1));
    assert!(err.is_format_error());
    assert!(rows.is_empty());
    assert_eq!(suite.run_threads(), vec![1]);
}

#[test]
fn test_build_failure_skips_workload_entirely() {
    let config = SweepConfig::new(
        ["small"],
        vec![
            Workload::new("A").with_param("small", 1),
            Workload::new("B").with_param("small", 1),
        ],
    )
    .with_threads(&[1])
    .with_trials(1);
    let plan = config.validate().unwrap();
    let mut suite = ScriptedSuite::new()
        .with_default(timing_text(1.0), ipc_report())
        .with_build_failure("A");
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();

    assert!(matches!(err, SweepError::Build { ref workload, .. } if workload == "A"));
    assert_eq!(suite.calls(), &[SuiteCall::Build("A".to_string())]);
    assert!(rows.is_empty());
}

#[test]
fn test_skip_workload_policy_continues() {
    let config = SweepConfig::new(
        ["small"],
        vec![
            Workload::new("A").with_param("small", 1),
            Workload::new("B").with_param("small", 1),
        ],
    )
    .with_threads(&[1, 2])
    .with_trials(1)
    .with_failure_policy(FailurePolicy::SkipWorkload);
    let plan = config.validate().unwrap();
    let mut suite = ScriptedSuite::new()
        .with_default(timing_text(2.0), ipc_report())
        .with_run_failure("A", "small", 2);
    let mut rows: Vec<OutputRow> = Vec::new();

    let summary = run_sweep(&plan, &mut suite, &mut rows).unwrap();

    assert_eq!(summary.workloads_completed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].workload, "A");
    assert!(!summary.is_complete());
    let written: Vec<(&str, u32)> = rows
        .iter()
        .map(|r| (r.configuration.workload.as_str(), r.configuration.threads))
        .collect();
    assert_eq!(written, vec![("A", 1), ("B", 1), ("B", 2)]);
    assert!(suite
        .calls()
        .contains(&SuiteCall::Uninstall("A".to_string())));
}

#[test]
fn test_uninstall_failure_reported_after_rows() {
    let plan = single_group_plan("A", &[1], 1);
    let mut suite = ScriptedSuite::new()
        .with_default(timing_text(1.0), ipc_report())
        .with_uninstall_failure("A");
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();

    assert!(matches!(err, SweepError::Uninstall { .. }));
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_run_failure_wins_over_cleanup_failure() {
    let plan = single_group_plan("A", &[1], 1);
    let mut suite = ScriptedSuite::new()
        .with_run_failure("A", "small", 1)
        .with_uninstall_failure("A");
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Trial {
            source: TrialError::External(_),
            ..
        }
    ));
}

#[test]
fn test_inconsistent_counter_sets_abort() {
    let plan = single_group_plan("A", &[1], 2);
    let with_cycles = PerfReport::new()
        .with_ratio("instructions:u", 100.0, 0.5)
        .counter("cycles:u", 200.0)
        .build();
    let mut suite = ScriptedSuite::new()
        .with_trial("A", "small", 1, timing_text(1.0), ipc_report())
        .with_trial("A", "small", 1, timing_text(1.0), with_cycles);
    let mut rows: Vec<OutputRow> = Vec::new();

    let err = run_sweep(&plan, &mut suite, &mut rows).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Trial {
            source: TrialError::Format(FormatError::InconsistentCounters { .. }),
            ..
        }
    ));
}

#[test]
fn test_sink_failure_identifies_configuration() {
    let plan = single_group_plan("A", &[1, 2], 1);
    let mut suite = ScriptedSuite::new().with_default(timing_text(1.0), ipc_report());
    let mut sink = FailingSink::new(1);

    let err = run_sweep(&plan, &mut suite, &mut sink).unwrap_err();
    match err {
        SweepError::Output { configuration, .. } => assert_eq!(configuration.threads, 2),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sink.rows.len(), 1);
}
