//! Report persistence (load/save).

use std::path::Path;

use crate::report::SweepReport;

/// Error reading or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report version {found} is not supported (expected {expected})")]
    Incompatible { found: u32, expected: u32 },
}

/// Save a report as pretty-printed JSON, creating parent directories.
pub fn save_report(report: &SweepReport, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(report)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "saved sweep report");
    Ok(())
}

/// Load a report and check its version.
pub fn load_report(path: &Path) -> Result<SweepReport, ReportError> {
    let content = std::fs::read_to_string(path)?;
    let report: SweepReport = serde_json::from_str(&content)?;
    if !report.is_compatible() {
        return Err(ReportError::Incompatible {
            found: report.version,
            expected: crate::report::REPORT_VERSION,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;
    use tempfile::TempDir;

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results").join("sweep.json");
        let report = sample_report();
        save_report(&report, &path).unwrap();
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn non_finite_values_load_back() {
        use parbench_core::speedup::SpeedupError;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nan.json");
        let mut report = sample_report();
        report.times.insert_time(800, 1, f64::NAN);
        report.skipped.push(SpeedupError::InvalidTime {
            size: 800,
            threads: 1,
            seconds: f64::INFINITY,
        });
        save_report(&report, &path).unwrap();

        let loaded = load_report(&path).unwrap();
        assert!(loaded.times.time(800, 1).unwrap().is_nan());
        assert!(matches!(
            loaded.skipped.last(),
            Some(SpeedupError::InvalidTime { seconds, .. }) if seconds.is_nan()
        ));
        assert_eq!(loaded.times.time(200, 1), report.times.time(200, 1));
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_report(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(matches!(load_report(&path), Err(ReportError::Json(_))));
    }

    #[test]
    fn load_rejects_other_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.json");
        let mut report = sample_report();
        report.version = 999;
        save_report(&report, &path).unwrap();
        assert!(matches!(
            load_report(&path),
            Err(ReportError::Incompatible { found: 999, .. })
        ));
    }
}
