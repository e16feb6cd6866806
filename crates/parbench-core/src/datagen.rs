//! Deterministic matrix and vector data for file-based runs.
//!
//! The program reads `matrix_B.txt` (one whitespace-separated row per line)
//! and `vector_x.txt` / `vector_y.txt` (one value per line). Values are
//! uniform in `[0, 10)` and printed with six decimals.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::{data_files, DATA_VALUE_SCALE};

/// Paths of the files written by [`generate_and_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub matrix: PathBuf,
    pub vector_x: PathBuf,
    pub vector_y: PathBuf,
}

/// Matrix and vectors generated from one seed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedData {
    pub size: usize,
    /// Row-major `size * size` entries.
    pub matrix: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl GeneratedData {
    /// Generate data for a `size x size` problem from `seed`.
    #[must_use]
    pub fn generate(size: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut draw = |n: usize| -> Vec<f64> {
            (0..n)
                .map(|_| rng.gen_range(0.0..DATA_VALUE_SCALE))
                .collect()
        };
        let matrix = draw(size * size);
        let x = draw(size);
        let y = draw(size);
        Self { size, matrix, x, y }
    }

    /// Write the three data files into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> io::Result<DataFiles> {
        std::fs::create_dir_all(dir)?;
        let files = DataFiles {
            matrix: dir.join(data_files::MATRIX),
            vector_x: dir.join(data_files::VECTOR_X),
            vector_y: dir.join(data_files::VECTOR_Y),
        };

        let mut out = BufWriter::new(File::create(&files.matrix)?);
        if self.size > 0 {
            for row in self.matrix.chunks(self.size) {
                write_row(&mut out, row)?;
            }
        }
        out.flush()?;

        write_vector(&files.vector_x, &self.x)?;
        write_vector(&files.vector_y, &self.y)?;
        Ok(files)
    }
}

/// Generate deterministic data for `size` and save it into `dir`.
pub fn generate_and_save(dir: &Path, size: usize, seed: u64) -> io::Result<DataFiles> {
    let data = GeneratedData::generate(size, seed);
    let files = data.save(dir)?;
    tracing::info!(size, seed, dir = %dir.display(), "generated input data");
    Ok(files)
}

fn write_row(out: &mut impl Write, row: &[f64]) -> io::Result<()> {
    for (i, v) in row.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write!(out, "{v:.6}")?;
    }
    out.write_all(b"\n")
}

fn write_vector(path: &Path, values: &[f64]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for v in values {
        writeln!(out, "{v:.6}")?;
    }
    out.flush()
}
