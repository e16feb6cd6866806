//! Timing and speedup tables keyed by problem size then thread count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate of repeated timings for one (size, threads) configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Median of the samples, in seconds.
    #[serde(deserialize_with = "nan_if_null")]
    pub median: f64,
    /// Fastest sample, in seconds.
    #[serde(deserialize_with = "nan_if_null")]
    pub min: f64,
    /// Slowest sample, in seconds.
    #[serde(deserialize_with = "nan_if_null")]
    pub max: f64,
    /// Number of samples aggregated.
    pub samples: usize,
}

impl Measurement {
    /// Aggregate a set of timings. Returns `None` for an empty set.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };

        Some(Self {
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            samples: sorted.len(),
        })
    }
}

/// JSON has no NaN or infinity: `serde_json` writes them as `null`, which is
/// read back as NaN.
pub(crate) fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Measured execution times: `size -> threads -> measurement`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingTable {
    entries: BTreeMap<usize, BTreeMap<usize, Measurement>>,
}

impl TimingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement, replacing any previous one for the same key.
    pub fn insert(&mut self, size: usize, threads: usize, measurement: Measurement) {
        self.entries
            .entry(size)
            .or_default()
            .insert(threads, measurement);
    }

    /// Record a single timing as a one-sample measurement.
    pub fn insert_time(&mut self, size: usize, threads: usize, seconds: f64) {
        self.insert(
            size,
            threads,
            Measurement {
                median: seconds,
                min: seconds,
                max: seconds,
                samples: 1,
            },
        );
    }

    #[must_use]
    pub fn get(&self, size: usize, threads: usize) -> Option<&Measurement> {
        self.entries.get(&size)?.get(&threads)
    }

    /// Median time for a configuration.
    #[must_use]
    pub fn time(&self, size: usize, threads: usize) -> Option<f64> {
        self.get(size, threads).map(|m| m.median)
    }

    /// Sizes with at least one measurement, ascending.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Measurements for one size, ordered by thread count.
    pub fn row(&self, size: usize) -> impl Iterator<Item = (usize, &Measurement)> + '_ {
        self.entries
            .get(&size)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&t, m)| (t, m)))
    }

    /// Total number of measured configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derived speedups: `size -> threads -> baseline / measured`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedupTable {
    entries: BTreeMap<usize, BTreeMap<usize, f64>>,
}

impl SpeedupTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, size: usize, threads: usize, speedup: f64) {
        self.entries.entry(size).or_default().insert(threads, speedup);
    }

    #[must_use]
    pub fn get(&self, size: usize, threads: usize) -> Option<f64> {
        self.entries.get(&size)?.get(&threads).copied()
    }

    /// Parallel efficiency: speedup divided by thread count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self, size: usize, threads: usize) -> Option<f64> {
        if threads == 0 {
            return None;
        }
        self.get(size, threads).map(|s| s / threads as f64)
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Speedups for one size, ordered by thread count.
    pub fn row(&self, size: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries
            .get(&size)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&t, &s)| (t, s)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }
}
