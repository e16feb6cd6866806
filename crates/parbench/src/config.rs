//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use parbench_core::constants::{
    BASELINE_THREADS, DEFAULT_DATA_SEED, DEFAULT_DATA_SIZE, DEFAULT_FIXED_SEED, DEFAULT_TOLERANCE,
    DEFAULT_VERIFY_THREADS, OMP_THREADS_ENV,
};
use parbench_core::error::HarnessError;
use parbench_core::launch::{InputSource, Mode, ModeKind};
use parbench_orchestration::sweep::{SeedPolicy, SweepPlan};
use parbench_orchestration::verification::VerificationPlan;

const OPENMP_THREADS: [usize; 5] = [1, 2, 4, 8, 16];
const MPI_THREADS: [usize; 7] = [1, 2, 4, 8, 16, 32, 64];
const MPI_SIZES: [usize; 3] = [200, 500, 1000];

/// parbench: speedup benchmarking harness for OpenMP and MPI programs.
#[derive(Parser, Debug)]
#[command(name = "parbench", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Program to benchmark [default: ./main (openmp), ./mpi_matrix (mpi)].
    #[arg(short, long, env = "PARBENCH_PROGRAM")]
    pub program: Option<String>,

    /// Parallelism model of the program: openmp or mpi.
    #[arg(short, long, default_value = "openmp", env = "PARBENCH_MODE")]
    pub mode: ModeKind,

    /// Thread or process counts, comma separated.
    #[arg(short, long, value_delimiter = ',', env = "PARBENCH_THREADS")]
    pub threads: Vec<usize>,

    /// Problem sizes, comma separated (mpi passes them as --size).
    #[arg(short, long, value_delimiter = ',', env = "PARBENCH_SIZES")]
    pub sizes: Vec<usize>,

    /// Repetitions per configuration; the median time is kept.
    #[arg(short, long, default_value = "1", env = "PARBENCH_RUNS")]
    pub runs: usize,

    /// Environment variable carrying the thread count (openmp).
    #[arg(long, default_value = OMP_THREADS_ENV, env = "PARBENCH_THREAD_ENV")]
    pub thread_env: String,

    /// MPI launcher executable.
    #[arg(long, default_value = "mpirun", env = "PARBENCH_MPIRUN")]
    pub mpirun: String,

    /// Launcher flag carrying the process count.
    #[arg(
        long,
        default_value = "--np",
        allow_hyphen_values = true,
        env = "PARBENCH_NP_FLAG"
    )]
    pub np_flag: String,

    /// Seed shared by both verification runs (mpi).
    #[arg(long, default_value_t = DEFAULT_FIXED_SEED, env = "PARBENCH_FIXED_SEED")]
    pub fixed_seed: u64,

    /// Seed for generated data files.
    #[arg(long, default_value_t = DEFAULT_DATA_SEED, env = "PARBENCH_DATA_SEED")]
    pub data_seed: u64,

    /// Directory the data files are written to. The program reads them from
    /// its own working directory, so anything but "." only suits programs
    /// started from that directory.
    #[arg(long, default_value = ".", env = "PARBENCH_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Run the whole sweep on generated data files with --use-files (openmp).
    #[arg(long, env = "PARBENCH_GENERATE_DATA")]
    pub generate_data: bool,

    /// Skip the sequential versus parallel verification.
    #[arg(long, env = "PARBENCH_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Thread count of the parallel verification run.
    #[arg(long, default_value_t = DEFAULT_VERIFY_THREADS, env = "PARBENCH_VERIFY_THREADS")]
    pub verify_threads: usize,

    /// Problem size of the verification runs (mpi).
    #[arg(long, default_value_t = DEFAULT_DATA_SIZE, env = "PARBENCH_VERIFY_SIZE")]
    pub verify_size: usize,

    /// Relative tolerance when comparing results.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, env = "PARBENCH_TOLERANCE")]
    pub tolerance: f64,

    /// Per-run time limit (e.g., "90s", "5m").
    #[arg(long, env = "PARBENCH_TIMEOUT")]
    pub timeout: Option<String>,

    /// Directory for charts.
    #[arg(short, long, default_value = ".", env = "PARBENCH_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Do not write charts.
    #[arg(long, env = "PARBENCH_NO_CHARTS")]
    pub no_charts: bool,

    /// Write a JSON report to this path.
    #[arg(long, env = "PARBENCH_JSON")]
    pub json: Option<PathBuf>,

    /// Render tables and charts from a saved JSON report without running anything.
    #[arg(long)]
    pub replot: Option<PathBuf>,

    /// Quiet mode (tables only).
    #[arg(short, long, env = "PARBENCH_QUIET")]
    pub quiet: bool,

    /// Verbose output and debug logging.
    #[arg(short, long, env = "PARBENCH_VERBOSE")]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,

    /// Extra arguments passed to the program after its own.
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

/// Validated settings of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchSettings {
    pub plan: SweepPlan,
    pub verification: Option<VerificationPlan>,
    /// Data files to generate before running: `(size, seed)`.
    pub data: Option<(usize, u64)>,
    pub timeout: Option<Duration>,
    /// Set when the baseline thread count had to be added.
    pub inserted_baseline: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// The mode with its launcher settings.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self.mode {
            ModeKind::OpenMp => Mode::OpenMp {
                thread_env: self.thread_env.clone(),
            },
            ModeKind::Mpi => Mode::Mpi {
                launcher: self.mpirun.clone(),
                np_flag: self.np_flag.clone(),
            },
        }
    }

    /// Validate the flags and resolve mode-dependent defaults.
    pub fn settings(&self) -> Result<BenchSettings, HarnessError> {
        let mode = self.mode();
        let (threads, inserted_baseline) = if self.threads.is_empty() {
            let defaults = match self.mode {
                ModeKind::OpenMp => OPENMP_THREADS.to_vec(),
                ModeKind::Mpi => MPI_THREADS.to_vec(),
            };
            (defaults, false)
        } else {
            normalize_threads(&self.threads)?
        };

        let sizes = match (self.mode, self.sizes.is_empty()) {
            (ModeKind::OpenMp, true) => vec![DEFAULT_DATA_SIZE],
            (ModeKind::Mpi, true) => MPI_SIZES.to_vec(),
            (_, false) => normalize_sizes(&self.sizes)?,
        };
        if !mode.passes_size() && sizes.len() > 1 {
            return Err(HarnessError::Config(
                "openmp programs run at a built-in size; pass a single --sizes value".into(),
            ));
        }

        if self.runs == 0 {
            return Err(HarnessError::Config("--runs must be at least 1".into()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(HarnessError::Config(format!(
                "invalid tolerance {}",
                self.tolerance
            )));
        }
        if self.generate_data && mode.passes_size() {
            return Err(HarnessError::Config(
                "--generate-data applies to openmp mode only".into(),
            ));
        }

        let timeout = match &self.timeout {
            Some(text) => Some(parse_duration(text).ok_or_else(|| {
                HarnessError::Config(format!("invalid timeout '{text}'"))
            })?),
            None => None,
        };

        let seeding = match self.mode {
            ModeKind::Mpi => SeedPolicy::Random,
            ModeKind::OpenMp if self.generate_data => SeedPolicy::Files,
            ModeKind::OpenMp => SeedPolicy::Program,
        };

        let verification = if self.skip_verify {
            None
        } else {
            if self.verify_threads == 0 {
                return Err(HarnessError::Config(
                    "--verify-threads must be positive".into(),
                ));
            }
            // OpenMP programs seed themselves from the clock, so both
            // verification runs read the same generated files.
            let (size, input) = match self.mode {
                ModeKind::Mpi => (self.verify_size, InputSource::Seeded(self.fixed_seed)),
                ModeKind::OpenMp => (sizes[0], InputSource::Files),
            };
            Some(VerificationPlan {
                threads: self.verify_threads,
                size,
                input,
                tolerance: self.tolerance,
            })
        };

        let needs_files = self.generate_data
            || verification
                .as_ref()
                .is_some_and(|v| v.input == InputSource::Files);
        let data = needs_files.then(|| (sizes[0], self.data_seed));
        let program = self.program.clone().unwrap_or_else(|| match self.mode {
            ModeKind::OpenMp => "./main".to_string(),
            ModeKind::Mpi => "./mpi_matrix".to_string(),
        });

        Ok(BenchSettings {
            plan: SweepPlan {
                mode,
                program,
                sizes,
                threads,
                runs: self.runs,
                seeding,
                extra_args: self.extra_args.clone(),
            },
            verification,
            data,
            timeout,
            inserted_baseline,
        })
    }
}

/// Sort and deduplicate thread counts, adding the single-thread baseline when
/// it is missing. Returns whether it was added.
pub fn normalize_threads(threads: &[usize]) -> Result<(Vec<usize>, bool), HarnessError> {
    if threads.is_empty() {
        return Err(HarnessError::Config("thread list is empty".into()));
    }
    if threads.contains(&0) {
        return Err(HarnessError::Config(
            "thread counts must be positive".into(),
        ));
    }
    let mut threads = threads.to_vec();
    let inserted = !threads.contains(&BASELINE_THREADS);
    if inserted {
        threads.push(BASELINE_THREADS);
    }
    threads.sort_unstable();
    threads.dedup();
    Ok((threads, inserted))
}

fn normalize_sizes(sizes: &[usize]) -> Result<Vec<usize>, HarnessError> {
    if sizes.contains(&0) {
        return Err(HarnessError::Config("sizes must be positive".into()));
    }
    let mut sizes = sizes.to_vec();
    sizes.sort_unstable();
    sizes.dedup();
    Ok(sizes)
}

/// Parse a duration string like "5m", "1h", "30s", "250ms".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> AppConfig {
        let mut argv = vec!["parbench"];
        argv.extend_from_slice(args);
        AppConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn openmp_defaults() {
        let s = config(&[]).settings().unwrap();
        assert_eq!(s.plan.program, "./main");
        assert_eq!(s.plan.threads, vec![1, 2, 4, 8, 16]);
        assert_eq!(s.plan.sizes, vec![1000]);
        assert_eq!(s.plan.seeding, SeedPolicy::Program);
        let v = s.verification.unwrap();
        assert_eq!(v.threads, 8);
        assert_eq!(v.input, InputSource::Files);
        assert_eq!(s.data, Some((1000, 42)));
        assert!(s.timeout.is_none());
    }

    #[test]
    fn openmp_verification_always_reads_files() {
        let s = config(&["--sizes", "64", "--data-seed", "9"]).settings().unwrap();
        assert_eq!(s.plan.seeding, SeedPolicy::Program);
        assert_eq!(s.verification.unwrap().input, InputSource::Files);
        assert_eq!(s.data, Some((64, 9)));

        let s = config(&["--skip-verify"]).settings().unwrap();
        assert!(s.data.is_none());
    }

    #[test]
    fn mpi_writes_no_files() {
        assert!(config(&["--mode", "mpi"]).settings().unwrap().data.is_none());
    }

    #[test]
    fn mpi_defaults() {
        let s = config(&["--mode", "mpi"]).settings().unwrap();
        assert_eq!(s.plan.program, "./mpi_matrix");
        assert_eq!(s.plan.threads, vec![1, 2, 4, 8, 16, 32, 64]);
        assert_eq!(s.plan.sizes, vec![200, 500, 1000]);
        assert_eq!(s.plan.seeding, SeedPolicy::Random);
        let v = s.verification.unwrap();
        assert_eq!(v.size, 1000);
        assert_eq!(v.input, InputSource::Seeded(532_556));
    }

    #[test]
    fn generated_data_uses_files() {
        let s = config(&["--generate-data", "--data-seed", "7"]).settings().unwrap();
        assert_eq!(s.plan.seeding, SeedPolicy::Files);
        assert_eq!(s.verification.unwrap().input, InputSource::Files);
        assert_eq!(s.data, Some((1000, 7)));
    }

    #[test]
    fn generate_data_rejected_for_mpi() {
        let err = config(&["--mode", "mpi", "--generate-data"]).settings().unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn thread_list_parsing() {
        let s = config(&["--threads", "8,2,4"]).settings().unwrap();
        assert_eq!(s.plan.threads, vec![1, 2, 4, 8]);
        assert!(s.inserted_baseline);
    }

    #[test]
    fn zero_threads_rejected() {
        assert!(config(&["--threads", "0,2"]).settings().is_err());
    }

    #[test]
    fn normalize_keeps_baseline() {
        assert_eq!(normalize_threads(&[4, 1, 4]).unwrap(), (vec![1, 4], false));
        assert!(normalize_threads(&[]).is_err());
    }

    #[test]
    fn openmp_single_size_only() {
        assert!(config(&["--sizes", "200,500"]).settings().is_err());
        let s = config(&["--mode", "mpi", "--sizes", "500,200"]).settings().unwrap();
        assert_eq!(s.plan.sizes, vec![200, 500]);
    }

    #[test]
    fn skip_verify() {
        assert!(config(&["--skip-verify"]).settings().unwrap().verification.is_none());
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(config(&["--runs", "0"]).settings().is_err());
        assert!(config(&["--tolerance=-1"]).settings().is_err());
        assert!(config(&["--timeout", "soon"]).settings().is_err());
        assert!(matches!(
            config(&["--timeout", "999999999999999999m"]).settings(),
            Err(HarnessError::Config(_))
        ));
        assert!(config(&["--verify-threads", "0"]).settings().is_err());
    }

    #[test]
    fn mpi_launcher_overrides() {
        let c = config(&["--mode", "mpi", "--mpirun", "srun", "--np-flag", "-n"]);
        assert_eq!(
            c.mode(),
            Mode::Mpi {
                launcher: "srun".into(),
                np_flag: "-n".into()
            }
        );
    }

    #[test]
    fn extra_args_after_separator() {
        let s = config(&["--", "--block", "64"]).settings().unwrap();
        assert_eq!(s.plan.extra_args, vec!["--block", "64"]);
    }

    #[test]
    fn timeout_parsed() {
        let s = config(&["--timeout", "90s"]).settings().unwrap();
        assert_eq!(s.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn parse_duration_formats() {
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("12"), Some(Duration::from_secs(12)));
        assert_eq!(parse_duration("x"), None);
        assert_eq!(parse_duration("999999999999999999m"), None);
        assert_eq!(parse_duration("18446744073709551615h"), None);
    }

    #[test]
    fn unknown_mode_rejected() {
        assert!(AppConfig::try_parse_from(["parbench", "--mode", "cuda"]).is_err());
    }
}
