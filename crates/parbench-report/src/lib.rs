//! # parbench-report
//!
//! Serializable sweep reports: timings, speedups, verification outcome, and
//! the host they were measured on.

pub mod io;
pub mod report;

pub use io::{load_report, save_report, ReportError};
pub use report::{HostInfo, SweepReport, REPORT_VERSION};
