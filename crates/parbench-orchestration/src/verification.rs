//! Sequential versus parallel agreement check.
//!
//! Both runs see identical input: the generated data files in OpenMP mode, a
//! fixed seed in MPI mode. A sequential run without a result aborts the whole
//! benchmark, since nothing after it can be trusted.

use serde::{Deserialize, Serialize};

use parbench_core::constants::BASELINE_THREADS;
use parbench_core::error::HarnessError;
use parbench_core::launch::{InputSource, Invocation};
use parbench_core::parser::{parse_output, ParsedOutput};
use parbench_core::progress::CancellationToken;
use parbench_core::verify::{is_close, relative_difference};

use crate::interfaces::{ProgramRunner, RunError};
use crate::sweep::SweepPlan;

/// Parameters of the agreement check.
#[derive(Debug, Clone)]
pub struct VerificationPlan {
    /// Thread count of the parallel run.
    pub threads: usize,
    /// Problem size for both runs.
    pub size: usize,
    /// Shared input for both runs.
    pub input: InputSource,
    /// Relative tolerance on `Result (d)`.
    pub tolerance: f64,
}

/// Values reported by one verification run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunValues {
    pub execution_time: f64,
    pub result: f64,
}

/// Outcome of comparing the two runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Passed,
    Mismatch,
    /// The parallel run produced no result to compare.
    ParallelMissing,
}

/// Full record of the agreement check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub size: usize,
    pub threads: usize,
    pub tolerance: f64,
    pub sequential: RunValues,
    pub parallel: Option<RunValues>,
    pub status: VerificationStatus,
    pub relative_difference: Option<f64>,
}

impl VerificationReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == VerificationStatus::Passed
    }
}

/// Run the program single-threaded and at `vplan.threads`, then compare.
pub fn verify(
    plan: &SweepPlan,
    vplan: &VerificationPlan,
    runner: &dyn ProgramRunner,
    cancel: &CancellationToken,
) -> Result<VerificationReport, HarnessError> {
    tracing::info!(size = vplan.size, threads = vplan.threads, "verifying parallel result");

    let sequential = run_once(plan, vplan, BASELINE_THREADS, runner, cancel)?;
    let Some(seq_time) = sequential.execution_time else {
        return Err(HarnessError::BaselineUnavailable("execution time"));
    };
    let Some(seq_result) = sequential.result else {
        return Err(HarnessError::BaselineUnavailable("result"));
    };
    let sequential = RunValues {
        execution_time: seq_time,
        result: seq_result,
    };

    let parallel = match run_once(plan, vplan, vplan.threads, runner, cancel) {
        Ok(parsed) => match (parsed.execution_time, parsed.result) {
            (Some(execution_time), Some(result)) => Some(RunValues {
                execution_time,
                result,
            }),
            _ => None,
        },
        Err(HarnessError::Cancelled) => return Err(HarnessError::Cancelled),
        Err(e) => {
            tracing::warn!(error = %e, "parallel verification run failed");
            None
        }
    };

    let (status, diff) = match parallel {
        None => (VerificationStatus::ParallelMissing, None),
        Some(par) => {
            let diff = relative_difference(sequential.result, par.result);
            if is_close(sequential.result, par.result, vplan.tolerance) {
                (VerificationStatus::Passed, Some(diff))
            } else {
                tracing::warn!(
                    sequential = sequential.result,
                    parallel = par.result,
                    diff,
                    "parallel result disagrees with sequential"
                );
                (VerificationStatus::Mismatch, Some(diff))
            }
        }
    };

    Ok(VerificationReport {
        size: vplan.size,
        threads: vplan.threads,
        tolerance: vplan.tolerance,
        sequential,
        parallel,
        status,
        relative_difference: diff,
    })
}

fn run_once(
    plan: &SweepPlan,
    vplan: &VerificationPlan,
    threads: usize,
    runner: &dyn ProgramRunner,
    cancel: &CancellationToken,
) -> Result<ParsedOutput, HarnessError> {
    cancel.check_cancelled()?;
    let spec = plan.command(&Invocation {
        threads,
        size: vplan.size,
        input: vplan.input,
    });
    tracing::debug!(command = %spec, "verification run");
    match runner.run(&spec, cancel) {
        Ok(output) => Ok(parse_output(&output.stdout)),
        Err(RunError::Cancelled) => Err(HarnessError::Cancelled),
        Err(e) => Err(HarnessError::Invocation(e.to_string())),
    }
}
