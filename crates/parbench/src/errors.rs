//! Error handling and exit codes.

use parbench_core::constants::exit_codes;
use parbench_core::error::HarnessError;
use parbench_report::ReportError;

/// Map an application error to the process exit code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<HarnessError>() {
        return harness_exit_code(err);
    }
    match err.downcast_ref::<ReportError>() {
        Some(ReportError::Incompatible { .. }) => exit_codes::ERROR_CONFIG,
        _ => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for a harness error.
#[must_use]
pub fn harness_exit_code(err: &HarnessError) -> i32 {
    match err {
        HarnessError::Config(_) => exit_codes::ERROR_CONFIG,
        HarnessError::Cancelled => exit_codes::ERROR_CANCELED,
        HarnessError::BaselineUnavailable(_)
        | HarnessError::Invocation(_)
        | HarnessError::Io(_) => exit_codes::ERROR_GENERIC,
    }
}
