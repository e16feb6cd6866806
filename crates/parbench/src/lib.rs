//! parbench library: application logic for the benchmarking harness.

pub mod app;
pub mod config;
pub mod errors;
