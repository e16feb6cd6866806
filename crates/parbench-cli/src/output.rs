//! CLI output formatting.

use std::fmt::Write as _;
use std::time::Duration;

use parbench_core::measurement::{SpeedupTable, TimingTable};

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Seconds as printed in timing tables.
#[must_use]
pub fn format_seconds(secs: f64) -> String {
    format!("{secs:.6}")
}

/// Speedup rounded to two decimals.
#[must_use]
pub fn format_speedup(speedup: f64) -> String {
    format!("{speedup:.2}")
}

/// Efficiency as a percentage.
#[must_use]
pub fn format_efficiency(efficiency: f64) -> String {
    format!("{:.1}%", efficiency * 100.0)
}

/// Render a bordered table with right-aligned cells.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    let _ = writeln!(out, "{border}");
    out.push('|');
    for (h, w) in headers.iter().zip(&widths) {
        let _ = write!(out, " {h:^w$} |");
    }
    out.push('\n');
    let _ = writeln!(out, "{border}");
    for row in rows {
        out.push('|');
        for (i, w) in widths.iter().enumerate() {
            let cell = row.get(i).map_or("", String::as_str);
            let _ = write!(out, " {cell:>w$} |");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{border}");
    out
}

/// Table of timings and speedups for one problem size.
///
/// Configurations with a timing but no speedup (no baseline) show `-`.
#[must_use]
pub fn size_table(size: usize, times: &TimingTable, speedups: &SpeedupTable) -> String {
    let show_spread = times.row(size).any(|(_, m)| m.samples > 1);
    let mut headers = vec!["Threads", "Time (s)"];
    if show_spread {
        headers.extend(["Min (s)", "Max (s)"]);
    }
    headers.extend(["Speedup", "Efficiency"]);

    let rows: Vec<Vec<String>> = times
        .row(size)
        .map(|(threads, m)| {
            let mut row = vec![threads.to_string(), format_seconds(m.median)];
            if show_spread {
                row.push(format_seconds(m.min));
                row.push(format_seconds(m.max));
            }
            row.push(
                speedups
                    .get(size, threads)
                    .map_or_else(|| "-".to_string(), format_speedup),
            );
            row.push(
                speedups
                    .efficiency(size, threads)
                    .map_or_else(|| "-".to_string(), format_efficiency),
            );
            row
        })
        .collect();

    render_table(&headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parbench_core::measurement::Measurement;

    #[test]
    fn format_duration_ranges() {
        assert!(format_duration(Duration::from_nanos(500)).contains("µs"));
        assert!(format_duration(Duration::from_millis(42)).contains("ms"));
        assert_eq!(format_duration(Duration::from_secs_f64(3.5)), "3.500s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30.0s");
    }

    #[test]
    fn number_formats() {
        assert_eq!(format_seconds(0.25), "0.250000");
        assert_eq!(format_speedup(3.14159), "3.14");
        assert_eq!(format_efficiency(0.875), "87.5%");
    }

    #[test]
    fn table_layout() {
        let table = render_table(
            &["Threads", "Speedup"],
            &[
                vec!["1".into(), "1.00".into()],
                vec!["16".into(), "11.52".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "+---------+---------+");
        assert_eq!(lines[1], "| Threads | Speedup |");
        assert_eq!(lines[3], "|       1 |    1.00 |");
        assert_eq!(lines[4], "|      16 |   11.52 |");
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn table_with_short_row() {
        let table = render_table(&["A", "B"], &[vec!["x".into()]]);
        assert!(table.contains("| x |   |"));
    }

    #[test]
    fn size_table_marks_missing_speedup() {
        let mut times = TimingTable::new();
        times.insert_time(200, 1, 1.0);
        times.insert_time(200, 4, 0.5);
        let mut speedups = SpeedupTable::new();
        speedups.insert(200, 1, 1.0);
        let table = size_table(200, &times, &speedups);
        assert!(table.contains("Efficiency"));
        assert!(!table.contains("Min (s)"));
        assert!(table.contains("100.0%"));
        assert!(table.lines().any(|l| l.contains("0.500000") && l.contains(" - ")));
    }

    #[test]
    fn size_table_shows_spread_for_repeats() {
        let mut times = TimingTable::new();
        times.insert(
            500,
            1,
            Measurement::from_samples(&[1.0, 1.2, 1.1]).unwrap(),
        );
        let mut speedups = SpeedupTable::new();
        speedups.insert(500, 1, 1.0);
        let table = size_table(500, &times, &speedups);
        assert!(table.contains("Min (s)"));
        assert!(table.contains("1.200000"));
    }
}
