//! Orchestration interfaces.

use std::time::Duration;

use parbench_core::launch::CommandSpec;
use parbench_core::measurement::TimingTable;
use parbench_core::progress::CancellationToken;
use parbench_core::speedup::SpeedupReport;

use crate::verification::VerificationReport;

/// Error raised while running the external program.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The program (or its launcher) could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on or reading from the child failed.
    #[error("I/O error while running program: {0}")]
    Io(#[from] std::io::Error),

    /// The child exceeded the per-run time limit and was killed.
    #[error("program killed after exceeding {0:?}")]
    Timeout(Duration),

    /// The run was cancelled and the child was killed.
    #[error("program run cancelled")]
    Cancelled,
}

/// Captured result of one program invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    /// Wall-clock time observed by the harness, including startup.
    pub wall_time: Duration,
}

/// Something that can run a [`CommandSpec`] to completion.
pub trait ProgramRunner: Send + Sync {
    /// Run the command, blocking until it exits, is cancelled, or times out.
    fn run(&self, spec: &CommandSpec, cancel: &CancellationToken) -> Result<RunOutput, RunError>;
}

impl<F> ProgramRunner for F
where
    F: Fn(&CommandSpec) -> Result<RunOutput, RunError> + Send + Sync,
{
    fn run(&self, spec: &CommandSpec, _cancel: &CancellationToken) -> Result<RunOutput, RunError> {
        self(spec)
    }
}

/// Event emitted by the sweep for each invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    /// An invocation is about to start.
    Started {
        size: usize,
        threads: usize,
        run: usize,
    },
    /// An execution time was recovered.
    Measured {
        size: usize,
        threads: usize,
        seconds: f64,
    },
    /// No execution time could be recovered for this invocation.
    Missing {
        size: usize,
        threads: usize,
        reason: String,
    },
}

/// Trait for reporting sweep progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// The sweep is about to perform `total` invocations.
    fn start(&self, total: u64);

    /// Report a sweep event.
    fn report(&self, event: &SweepEvent);

    /// Report completion.
    fn complete(&self);
}

/// Trait for presenting results to the user.
pub trait ResultPresenter {
    /// Present the outcome of the sequential/parallel agreement check.
    fn present_verification(&self, report: &VerificationReport);

    /// Present timing and speedup tables.
    fn present_tables(&self, times: &TimingTable, speedups: &SpeedupReport);

    /// Present a non-fatal problem.
    fn present_warning(&self, message: &str);

    /// Present an error.
    fn present_error(&self, message: &str);
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn start(&self, _total: u64) {}
    fn report(&self, _event: &SweepEvent) {}
    fn complete(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_reporter() {
        let reporter = NullProgressReporter;
        reporter.start(3);
        reporter.report(&SweepEvent::Started {
            size: 200,
            threads: 1,
            run: 0,
        });
        reporter.complete();
    }

    #[test]
    fn closure_runner() {
        let runner = |spec: &CommandSpec| {
            Ok::<_, RunError>(RunOutput {
                stdout: format!("ran {}", spec.program),
                success: true,
                exit_code: Some(0),
                ..RunOutput::default()
            })
        };
        let spec = CommandSpec {
            program: "./main".into(),
            args: vec![],
            envs: vec![],
        };
        let out = runner.run(&spec, &CancellationToken::new()).unwrap();
        assert_eq!(out.stdout, "ran ./main");
    }

    #[test]
    fn spawn_error_message() {
        let err = RunError::Spawn {
            program: "./missing".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("./missing"));
    }
}
