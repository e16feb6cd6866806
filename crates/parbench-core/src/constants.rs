//! Constants for output labels, defaults, and exit codes.

/// Label preceding the measured execution time in the program's output.
pub const EXECUTION_TIME_LABEL: &str = "Execution Time";

/// Label preceding the computed scalar result in the program's output.
pub const RESULT_LABEL: &str = "Result (d)";

/// Thread count used as the speedup baseline.
pub const BASELINE_THREADS: usize = 1;

/// Default relative tolerance when comparing sequential and parallel results.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default seed for verification runs in MPI mode.
pub const DEFAULT_FIXED_SEED: u64 = 532_556;

/// Default seed for generated input data files.
pub const DEFAULT_DATA_SEED: u64 = 42;

/// Default matrix dimension baked into the OpenMP program.
pub const DEFAULT_DATA_SIZE: usize = 1000;

/// Default thread count for the verification run.
pub const DEFAULT_VERIFY_THREADS: usize = 8;

/// Environment variable read by OpenMP runtimes.
pub const OMP_THREADS_ENV: &str = "OMP_NUM_THREADS";

/// Flag asking the OpenMP program to read its input from files.
pub const USE_FILES_FLAG: &str = "--use-files";

/// Flag carrying the problem size.
pub const SIZE_FLAG: &str = "--size";

/// Flag carrying the RNG seed.
pub const SEED_FLAG: &str = "--seed";

/// Upper bound (exclusive) of generated matrix and vector values.
pub const DATA_VALUE_SCALE: f64 = 10.0;

/// Generated data file names, as read by the external program.
pub mod data_files {
    pub const MATRIX: &str = "matrix_B.txt";
    pub const VECTOR_X: &str = "vector_x.txt";
    pub const VECTOR_Y: &str = "vector_y.txt";
}

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// The sweep finished without a single usable measurement.
    pub const ERROR_NO_RESULTS: i32 = 2;
    /// Sequential and parallel results disagreed.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
