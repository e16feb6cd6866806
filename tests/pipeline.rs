//! Workspace-level pipeline tests.
//!
//! Drives the real process runner against a shell script standing in for the
//! benchmarked program, then carries the results through speedup derivation
//! and report persistence.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use parbench_core::datagen::generate_and_save;
use parbench_core::launch::{InputSource, Mode};
use parbench_core::progress::CancellationToken;
use parbench_core::speedup::{compute_speedups, SpeedupError};
use parbench_orchestration::interfaces::NullProgressReporter;
use parbench_orchestration::runner::ProcessRunner;
use parbench_orchestration::sweep::{execute_sweep, SeedPolicy, SweepPlan};
use parbench_orchestration::verification::{verify, VerificationPlan, VerificationStatus};
use parbench_report::{load_report, save_report, HostInfo, SweepReport};

fn script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("program.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn openmp_plan(program: &Path, threads: Vec<usize>, seeding: SeedPolicy) -> SweepPlan {
    SweepPlan {
        mode: Mode::openmp(),
        program: program.display().to_string(),
        sizes: vec![1000],
        threads,
        runs: 1,
        seeding,
        extra_args: vec![],
    }
}

#[test]
fn sweep_speedups_and_report() {
    let dir = TempDir::new().unwrap();
    let program = script(
        dir.path(),
        r#"case "$OMP_NUM_THREADS" in
  1) echo "Execution Time: 6.0" ;;
  2) echo "Execution Time: 3.0" ;;
  3) echo "Execution Time: 2.0" ;;
esac
echo "Result (d): 99.5""#,
    );
    let plan = openmp_plan(&program, vec![1, 2, 3], SeedPolicy::Program);
    let runner = ProcessRunner::new().with_timeout(Some(Duration::from_secs(30)));
    let cancel = CancellationToken::new();

    let outcome = execute_sweep(&plan, &runner, &NullProgressReporter, &cancel);
    assert!(!outcome.cancelled);
    assert_eq!(outcome.times.len(), 3);

    let speedups = compute_speedups(&outcome.times);
    assert!(speedups.skipped.is_empty());
    assert_eq!(speedups.speedups.get(1000, 1), Some(1.0));
    assert_eq!(speedups.speedups.get(1000, 2), Some(2.0));
    assert_eq!(speedups.speedups.get(1000, 3), Some(3.0));
    assert_eq!(speedups.speedups.efficiency(1000, 3), Some(1.0));

    let host = HostInfo {
        cpu_model: "Test CPU".into(),
        num_cores: 4,
        hostname: None,
    };
    let report = SweepReport::new(&plan, &outcome, &speedups, None, host);
    let path = dir.path().join("out").join("report.json");
    save_report(&report, &path).unwrap();
    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded.times, outcome.times);
    assert_eq!(loaded.recompute_speedups().speedups, speedups.speedups);
}

#[test]
fn missing_baseline_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let program = script(
        dir.path(),
        r#"[ "$OMP_NUM_THREADS" = "1" ] && exit 1
echo "Execution Time: 1.5""#,
    );
    let plan = openmp_plan(&program, vec![1, 2, 4], SeedPolicy::Program);

    let outcome = execute_sweep(
        &plan,
        &ProcessRunner::new(),
        &NullProgressReporter,
        &CancellationToken::new(),
    );
    assert_eq!(outcome.times.len(), 2);
    assert_eq!(outcome.missing.len(), 1);

    let speedups = compute_speedups(&outcome.times);
    assert!(speedups.speedups.is_empty());
    assert_eq!(
        speedups.skipped,
        vec![SpeedupError::MissingBaseline { size: 1000 }]
    );
}

#[test]
fn verification_over_generated_files() {
    let dir = TempDir::new().unwrap();
    let files = generate_and_save(&dir.path().join("data"), 8, 42).unwrap();
    // Both runs print the first value of x, so they agree only if they read the file.
    let program = script(
        dir.path(),
        &format!(
            r#"[ "$1" = "--use-files" ] || exit 1
echo "Result (d): $(head -n 1 '{}')"
echo "Execution Time: 0.$OMP_NUM_THREADS""#,
            files.vector_x.display()
        ),
    );
    let plan = openmp_plan(&program, vec![1, 8], SeedPolicy::Files);
    let vplan = VerificationPlan {
        threads: 8,
        size: 8,
        input: InputSource::Files,
        tolerance: 1e-6,
    };

    let report = verify(
        &plan,
        &vplan,
        &ProcessRunner::new(),
        &CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(report.status, VerificationStatus::Passed);
    assert_eq!(report.relative_difference, Some(0.0));
    assert!((report.sequential.execution_time - 0.1).abs() < 1e-12);
}

#[test]
fn timeout_turns_into_missing_point() {
    let dir = TempDir::new().unwrap();
    let program = script(dir.path(), "sleep 5\necho \"Execution Time: 1.0\"");
    let plan = openmp_plan(&program, vec![1], SeedPolicy::Program);
    let runner = ProcessRunner::new().with_timeout(Some(Duration::from_millis(200)));

    let outcome = execute_sweep(
        &plan,
        &runner,
        &NullProgressReporter,
        &CancellationToken::new(),
    );
    assert!(outcome.times.is_empty());
    assert_eq!(outcome.missing.len(), 1);
    assert!(outcome.missing[0].reason.contains("killed"));
}
