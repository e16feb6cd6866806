//! # parbench-core
//!
//! Output parsing, timing tables, speedup derivation, invocation descriptions,
//! and deterministic input data generation for the parbench harness.

pub mod constants;
pub mod datagen;
pub mod error;
pub mod launch;
pub mod measurement;
pub mod parser;
pub mod progress;
pub mod speedup;
pub mod verify;

pub use error::HarnessError;
pub use launch::{CommandSpec, InputSource, Invocation, Mode};
pub use measurement::{Measurement, SpeedupTable, TimingTable};
pub use parser::{parse_output, ParsedOutput};
pub use progress::CancellationToken;
pub use speedup::{compute_speedups, SpeedupError, SpeedupReport};
