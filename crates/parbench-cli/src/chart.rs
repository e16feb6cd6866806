//! SVG line charts of execution time and speedup against thread count.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parbench_core::measurement::{SpeedupTable, TimingTable};

/// File name of the execution time chart.
pub const EXECUTION_TIME_CHART: &str = "execution_time_vs_threads.svg";

/// File name of the speedup chart.
pub const SPEEDUP_CHART: &str = "speedup_vs_threads.svg";

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 190.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub dashed: bool,
}

/// A line chart with a linear x axis ticked at the measured thread counts.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

struct Bounds {
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl LineChart {
    #[must_use]
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    fn x_ticks(&self) -> Vec<f64> {
        let mut xs: Vec<f64> = self
            .series
            .iter()
            .filter(|s| !s.dashed)
            .flat_map(|s| s.points.iter().map(|&(x, _)| x))
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        xs
    }

    fn bounds(&self) -> Bounds {
        let xs = self.x_ticks();
        let (mut x_min, mut x_max) = match (xs.first(), xs.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 1.0),
        };
        if (x_max - x_min).abs() < f64::EPSILON {
            x_min -= 1.0;
            x_max += 1.0;
        }
        let y_max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y))
            .filter(|y| y.is_finite())
            .fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
        Bounds { x_min, x_max, y_max }
    }

    /// Write the chart as a standalone SVG document.
    #[allow(clippy::cast_precision_loss)]
    pub fn write_svg<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let b = self.bounds();
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let sx = |x: f64| MARGIN_LEFT + (x - b.x_min) / (b.x_max - b.x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y / b.y_max) * plot_h;

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        )?;
        writeln!(out, r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        writeln!(
            out,
            r#"  <text x="{:.1}" y="30" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            escape(&self.title)
        )?;

        // Grid and y ticks
        for i in 0..=Y_TICKS {
            let value = b.y_max * i as f64 / Y_TICKS as f64;
            let y = sy(value);
            writeln!(
                out,
                r##"  <line x1="{MARGIN_LEFT:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
                MARGIN_LEFT + plot_w
            )?;
            writeln!(
                out,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0,
                tick_label(value)
            )?;
        }

        // X ticks at measured thread counts
        for x in self.x_ticks() {
            let px = sx(x);
            writeln!(
                out,
                r##"  <line x1="{px:.1}" y1="{MARGIN_TOP:.1}" x2="{px:.1}" y2="{:.1}" stroke="#eeeeee"/>"##,
                MARGIN_TOP + plot_h
            )?;
            writeln!(
                out,
                r#"  <text x="{px:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
                MARGIN_TOP + plot_h + 20.0,
                tick_label(x)
            )?;
        }

        // Axes
        writeln!(
            out,
            r##"  <rect x="{MARGIN_LEFT:.1}" y="{MARGIN_TOP:.1}" width="{plot_w:.1}" height="{plot_h:.1}" fill="none" stroke="#333333"/>"##
        )?;
        writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 20.0,
            escape(&self.x_label)
        )?;
        writeln!(
            out,
            r#"  <text x="20" y="{:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 20 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            escape(&self.y_label)
        )?;

        if self.series.iter().all(|s| s.points.is_empty()) {
            writeln!(
                out,
                r##"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" fill="#999999">no data</text>"##,
                MARGIN_LEFT + plot_w / 2.0,
                MARGIN_TOP + plot_h / 2.0
            )?;
        }

        // Series and legend
        let mut legend_row = 0.0;
        for (i, series) in self.series.iter().enumerate() {
            let color = if series.dashed {
                "#555555"
            } else {
                PALETTE[i % PALETTE.len()]
            };
            let dash = if series.dashed {
                r#" stroke-dasharray="6 4""#
            } else {
                ""
            };
            let pixels: Vec<(f64, f64)> = series
                .points
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|&(x, y)| (sx(x), sy(y.min(b.y_max))))
                .collect();
            if !pixels.is_empty() {
                let path: Vec<String> = pixels
                    .iter()
                    .map(|(px, py)| format!("{px:.1},{py:.1}"))
                    .collect();
                writeln!(
                    out,
                    r#"  <polyline points="{}" fill="none" stroke="{color}" stroke-width="2"{dash}/>"#,
                    path.join(" ")
                )?;
            }
            if !series.dashed {
                for (cx, cy) in &pixels {
                    writeln!(
                        out,
                        r#"  <circle cx="{cx:.1}" cy="{cy:.1}" r="4" fill="{color}"/>"#
                    )?;
                }
            }

            let ly = MARGIN_TOP + 10.0 + legend_row * 22.0;
            let lx = WIDTH - MARGIN_RIGHT + 20.0;
            writeln!(
                out,
                r#"  <line x1="{lx:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{color}" stroke-width="2"{dash}/>"#,
                lx + 24.0
            )?;
            writeln!(
                out,
                r#"  <text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                lx + 30.0,
                ly + 4.0,
                escape(&series.label)
            )?;
            legend_row += 1.0;
        }

        writeln!(out, "</svg>")
    }

    /// Write the chart to `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_svg(&mut out)?;
        out.flush()
    }
}

fn tick_label(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else if value.abs() >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn size_label(size: usize) -> String {
    format!("Size {size}x{size}")
}

/// Execution time against thread count, one line per problem size.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn execution_time_chart(times: &TimingTable) -> LineChart {
    let mut chart = LineChart::new(
        "Execution Time vs Number of Threads",
        "Number of Threads",
        "Execution Time (seconds)",
    );
    for size in times.sizes() {
        chart.series.push(Series {
            label: size_label(size),
            points: times.row(size).map(|(t, m)| (t as f64, m.median)).collect(),
            dashed: false,
        });
    }
    chart
}

/// Speedup against thread count, one line per size plus the ideal `y = x`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn speedup_chart(speedups: &SpeedupTable) -> LineChart {
    let mut chart = LineChart::new(
        "Speedup vs Threads (Acceleration Analysis)",
        "Number of Threads",
        "Speedup (Acceleration)",
    );
    let mut threads: Vec<usize> = Vec::new();
    for size in speedups.sizes() {
        let points: Vec<(f64, f64)> = speedups.row(size).map(|(t, s)| (t as f64, s)).collect();
        threads.extend(speedups.row(size).map(|(t, _)| t));
        chart.series.push(Series {
            label: size_label(size),
            points,
            dashed: false,
        });
    }
    threads.sort_unstable();
    threads.dedup();
    if !threads.is_empty() {
        chart.series.push(Series {
            label: "Ideal (linear)".to_string(),
            points: threads.iter().map(|&t| (t as f64, t as f64)).collect(),
            dashed: true,
        });
    }
    chart
}

/// Write both charts into `dir`, returning the files written.
pub fn write_charts(dir: &Path, times: &TimingTable, speedups: &SpeedupTable) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let time_path = dir.join(EXECUTION_TIME_CHART);
    execution_time_chart(times).save(&time_path)?;
    let speedup_path = dir.join(SPEEDUP_CHART);
    speedup_chart(speedups).save(&speedup_path)?;
    tracing::info!(dir = %dir.display(), "wrote charts");
    Ok(vec![time_path, speedup_path])
}
