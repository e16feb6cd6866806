//! Agreement checks between a sequential and a parallel result.

/// Relative closeness: `|a - b| <= rel_tol * max(|a|, |b|)`.
///
/// Exactly equal values (including two zeros) are always close. `NaN` is
/// never close to anything.
#[must_use]
pub fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

/// Relative difference between two results, used in mismatch reports.
#[must_use]
pub fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}
