//! # parbench-orchestration
//!
//! Program invocation, sequential measurement sweeps, and result verification.

pub mod interfaces;
pub mod runner;
pub mod sweep;
pub mod verification;

pub use interfaces::{ProgramRunner, ProgressReporter, ResultPresenter, RunError, RunOutput};
pub use runner::ProcessRunner;
pub use sweep::{execute_sweep, SeedPolicy, SweepOutcome, SweepPlan};
pub use verification::{verify, VerificationPlan, VerificationReport, VerificationStatus};
