//! Sweep report (serializable).

use serde::{Deserialize, Serialize};

use parbench_core::measurement::{SpeedupTable, TimingTable};
use parbench_core::speedup::{compute_speedups, SpeedupError, SpeedupReport};
use parbench_orchestration::sweep::{MissingPoint, Sample, SweepOutcome, SweepPlan};
use parbench_orchestration::verification::VerificationReport;

/// Current report format version.
pub const REPORT_VERSION: u32 = 1;

/// Machine the sweep ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// CPU brand string.
    pub cpu_model: String,
    /// Logical cores available to the harness.
    pub num_cores: usize,
    /// Host name, when the OS reports one.
    pub hostname: Option<String>,
}

impl HostInfo {
    /// Probe the current machine.
    #[must_use]
    pub fn detect() -> Self {
        use sysinfo::System;
        let sys = System::new_all();
        let cpu_model = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default();
        Self {
            cpu_model,
            num_cores: num_cpus(),
            hostname: System::host_name(),
        }
    }
}

/// Everything a sweep produced, in a form that can be saved and replotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Report format version for compatibility checking.
    pub version: u32,
    /// `openmp` or `mpi`.
    pub mode: String,
    pub program: String,
    pub sizes: Vec<usize>,
    pub threads: Vec<usize>,
    pub runs: usize,
    pub host: HostInfo,
    /// Report timestamp (`unix:<seconds>`).
    pub timestamp: String,
    pub verification: Option<VerificationReport>,
    pub times: TimingTable,
    pub speedups: SpeedupTable,
    #[serde(default)]
    pub skipped: Vec<SpeedupError>,
    #[serde(default)]
    pub samples: Vec<Sample>,
    #[serde(default)]
    pub missing: Vec<MissingPoint>,
    #[serde(default)]
    pub cancelled: bool,
}

impl SweepReport {
    /// Assemble a report from a finished sweep.
    #[must_use]
    pub fn new(
        plan: &SweepPlan,
        outcome: &SweepOutcome,
        speedups: &SpeedupReport,
        verification: Option<VerificationReport>,
        host: HostInfo,
    ) -> Self {
        Self {
            version: REPORT_VERSION,
            mode: plan.mode.name().to_string(),
            program: plan.program.clone(),
            sizes: plan.sizes.clone(),
            threads: plan.threads.clone(),
            runs: plan.runs,
            host,
            timestamp: current_timestamp(),
            verification,
            times: outcome.times.clone(),
            speedups: speedups.speedups.clone(),
            skipped: speedups.skipped.clone(),
            samples: outcome.samples.clone(),
            missing: outcome.missing.clone(),
            cancelled: outcome.cancelled,
        }
    }

    /// Check if this report was written by a compatible version.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == REPORT_VERSION
    }

    /// Speedups recomputed from the stored timings.
    #[must_use]
    pub fn recompute_speedups(&self) -> SpeedupReport {
        compute_speedups(&self.times)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1)
}

/// Get the current timestamp as seconds since the UNIX epoch.
#[must_use]
pub fn current_timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", dur.as_secs())
}
