//! Speedup derivation relative to the single-thread baseline.

use serde::{Deserialize, Serialize};

use crate::constants::BASELINE_THREADS;
use crate::measurement::{SpeedupTable, TimingTable};

/// Reason a size or configuration was left out of the speedup table.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum SpeedupError {
    /// No single-thread timing exists for this size.
    #[error("size {size}: no single-thread baseline measured")]
    MissingBaseline { size: usize },

    /// A timing that cannot act as a divisor or dividend.
    #[error("size {size}, {threads} threads: invalid time {seconds}")]
    InvalidTime {
        size: usize,
        threads: usize,
        #[serde(deserialize_with = "crate::measurement::nan_if_null")]
        seconds: f64,
    },
}


/// Speedups plus the entries that could not be derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedupReport {
    pub speedups: SpeedupTable,
    pub skipped: Vec<SpeedupError>,
}

/// Compute `baseline / measured` for every measured configuration.
///
/// The baseline of a size is its timing at one thread, so the speedup at one
/// thread is always exactly `1.0`. Sizes without a baseline are skipped and
/// reported rather than aborting the whole table.
#[must_use]
pub fn compute_speedups(times: &TimingTable) -> SpeedupReport {
    let mut report = SpeedupReport::default();

    for size in times.sizes() {
        let Some(baseline) = times.time(size, BASELINE_THREADS) else {
            tracing::warn!(size, "no baseline timing, skipping size");
            report.skipped.push(SpeedupError::MissingBaseline { size });
            continue;
        };
        if !is_usable(baseline) {
            report.skipped.push(SpeedupError::InvalidTime {
                size,
                threads: BASELINE_THREADS,
                seconds: baseline,
            });
            continue;
        }

        for (threads, measurement) in times.row(size) {
            let seconds = measurement.median;
            if !is_usable(seconds) {
                tracing::warn!(size, threads, seconds, "invalid timing, skipping");
                report.skipped.push(SpeedupError::InvalidTime {
                    size,
                    threads,
                    seconds,
                });
                continue;
            }
            let speedup = if threads == BASELINE_THREADS {
                1.0
            } else {
                baseline / seconds
            };
            if !speedup.is_finite() {
                tracing::warn!(size, threads, seconds, "speedup overflows, skipping");
                report.skipped.push(SpeedupError::InvalidTime {
                    size,
                    threads,
                    seconds,
                });
                continue;
            }
            report.speedups.insert(size, threads, speedup);
        }
    }

    report
}

fn is_usable(seconds: f64) -> bool {
    seconds.is_finite() && seconds > 0.0
}
