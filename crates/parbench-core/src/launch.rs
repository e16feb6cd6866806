//! Description of a single program invocation.
//!
//! Building a [`CommandSpec`] is pure: nothing is spawned here, which keeps
//! argument construction testable. The runner in `parbench-orchestration`
//! turns a spec into a child process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{OMP_THREADS_ENV, SEED_FLAG, SIZE_FLAG, USE_FILES_FLAG};

/// How the external program receives its parallelism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Shared-memory threads; the count travels in an environment variable.
    OpenMp {
        /// Name of the variable carrying the thread count.
        thread_env: String,
    },
    /// Message passing; the program is started through a launcher.
    Mpi {
        /// Launcher executable, e.g. `mpirun`.
        launcher: String,
        /// Launcher flag carrying the process count, e.g. `--np`.
        np_flag: String,
    },
}

impl Mode {
    /// OpenMP mode with the standard `OMP_NUM_THREADS` variable.
    #[must_use]
    pub fn openmp() -> Self {
        Self::OpenMp {
            thread_env: OMP_THREADS_ENV.to_string(),
        }
    }

    /// MPI mode launched with `mpirun --np`.
    #[must_use]
    pub fn mpi() -> Self {
        Self::Mpi {
            launcher: "mpirun".to_string(),
            np_flag: "--np".to_string(),
        }
    }

    /// Short name used in reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenMp { .. } => "openmp",
            Self::Mpi { .. } => "mpi",
        }
    }

    /// Whether the problem size is passed on the command line.
    #[must_use]
    pub fn passes_size(&self) -> bool {
        matches!(self, Self::Mpi { .. })
    }
}

/// Kind of mode, as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    OpenMp,
    Mpi,
}

impl FromStr for ModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openmp" | "omp" | "threads" => Ok(Self::OpenMp),
            "mpi" | "processes" => Ok(Self::Mpi),
            other => Err(format!("unknown mode '{other}' (expected openmp or mpi)")),
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenMp => f.write_str("openmp"),
            Self::Mpi => f.write_str("mpi"),
        }
    }
}

/// Where the program takes its input data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    /// The program generates and seeds its own data.
    Generated,
    /// The program generates data from the given seed.
    Seeded(u64),
    /// The program reads the data files written by `datagen`.
    Files,
}

/// One configuration to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub threads: usize,
    pub size: usize,
    pub input: InputSource,
}

/// Fully resolved command: executable, arguments, and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    /// Build the command for `invocation` of `program` under `mode`.
    ///
    /// `extra_args` are appended after the harness's own arguments.
    #[must_use]
    pub fn build(mode: &Mode, program: &str, invocation: &Invocation, extra_args: &[String]) -> Self {
        let mut program_args = Vec::new();
        if mode.passes_size() {
            program_args.push(SIZE_FLAG.to_string());
            program_args.push(invocation.size.to_string());
        }
        match invocation.input {
            InputSource::Generated => {}
            InputSource::Seeded(seed) => {
                program_args.push(SEED_FLAG.to_string());
                program_args.push(seed.to_string());
            }
            InputSource::Files => program_args.push(USE_FILES_FLAG.to_string()),
        }
        program_args.extend(extra_args.iter().cloned());

        match mode {
            Mode::OpenMp { thread_env } => Self {
                program: program.to_string(),
                args: program_args,
                envs: vec![(thread_env.clone(), invocation.threads.to_string())],
            },
            Mode::Mpi { launcher, np_flag } => {
                let mut args = vec![
                    np_flag.clone(),
                    invocation.threads.to_string(),
                    program.to_string(),
                ];
                args.extend(program_args);
                Self {
                    program: launcher.clone(),
                    args,
                    envs: Vec::new(),
                }
            }
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inv(threads: usize, size: usize, input: InputSource) -> Invocation {
        Invocation {
            threads,
            size,
            input,
        }
    }

    #[test]
    fn openmp_uses_env_var() {
        let spec = CommandSpec::build(
            &Mode::openmp(),
            "./main",
            &inv(4, 1000, InputSource::Generated),
            &[],
        );
        assert_eq!(spec.program, "./main");
        assert!(spec.args.is_empty());
        assert_eq!(
            spec.envs,
            vec![("OMP_NUM_THREADS".to_string(), "4".to_string())]
        );
    }

    #[test]
    fn openmp_files_flag() {
        let spec = CommandSpec::build(&Mode::openmp(), "./main", &inv(1, 1000, InputSource::Files), &[]);
        assert_eq!(spec.args, vec!["--use-files"]);
    }

    #[test]
    fn mpi_wraps_program() {
        let spec = CommandSpec::build(
            &Mode::mpi(),
            "./mpi_matrix",
            &inv(8, 500, InputSource::Seeded(532_556)),
            &[],
        );
        assert_eq!(spec.program, "mpirun");
        assert_eq!(
            spec.args,
            vec!["--np", "8", "./mpi_matrix", "--size", "500", "--seed", "532556"]
        );
        assert!(spec.envs.is_empty());
    }

    #[test]
    fn extra_args_appended_last() {
        let extra = vec!["--verbose".to_string()];
        let spec = CommandSpec::build(&Mode::mpi(), "./p", &inv(2, 200, InputSource::Generated), &extra);
        assert_eq!(spec.args.last().map(String::as_str), Some("--verbose"));
    }

    #[test]
    fn custom_launcher() {
        let mode = Mode::Mpi {
            launcher: "srun".into(),
            np_flag: "-n".into(),
        };
        let spec = CommandSpec::build(&mode, "./p", &inv(16, 200, InputSource::Generated), &[]);
        assert_eq!(spec.program, "srun");
        assert_eq!(&spec.args[..3], &["-n", "16", "./p"]);
    }

    #[test]
    fn display_shows_env_and_args() {
        let spec = CommandSpec::build(&Mode::openmp(), "./main", &inv(2, 1000, InputSource::Files), &[]);
        assert_eq!(spec.to_string(), "OMP_NUM_THREADS=2 ./main --use-files");
    }

    #[test]
    fn mode_kind_parsing() {
        assert_eq!("OpenMP".parse::<ModeKind>(), Ok(ModeKind::OpenMp));
        assert_eq!("mpi".parse::<ModeKind>(), Ok(ModeKind::Mpi));
        assert!("cuda".parse::<ModeKind>().is_err());
        assert_eq!(ModeKind::Mpi.to_string(), "mpi");
    }
}
