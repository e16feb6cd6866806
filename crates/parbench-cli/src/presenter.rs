//! CLI result presenter and progress reporter.

use indicatif::{ProgressBar, ProgressStyle};

use parbench_core::measurement::TimingTable;
use parbench_core::speedup::SpeedupReport;
use parbench_orchestration::interfaces::{ProgressReporter, ResultPresenter, SweepEvent};
use parbench_orchestration::verification::{VerificationReport, VerificationStatus};

use crate::output::{format_seconds, size_table};
use crate::ui;

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

/// Lines describing a verification outcome.
#[must_use]
pub fn verification_lines(report: &VerificationReport) -> Vec<String> {
    let seq = &report.sequential;
    let mut lines = vec![
        format!("Sequential Result: {}", seq.result),
        format!(
            "Sequential Execution Time: {} seconds",
            format_seconds(seq.execution_time)
        ),
    ];
    match (report.status, report.parallel) {
        (VerificationStatus::Passed, Some(par)) => lines.push(format!(
            "Validation passed for {} threads. Result: {}",
            report.threads, par.result
        )),
        (VerificationStatus::Mismatch, Some(par)) => lines.push(format!(
            "Validation failed for {} threads! Sequential: {}, Parallel: {}",
            report.threads, seq.result, par.result
        )),
        _ => lines.push(format!(
            "Failed to retrieve results for {} threads.",
            report.threads
        )),
    }
    lines
}

impl ResultPresenter for CLIResultPresenter {
    fn present_verification(&self, report: &VerificationReport) {
        let lines = verification_lines(report);
        let Some((verdict, context)) = lines.split_last() else {
            return;
        };
        if self.quiet {
            if !report.passed() {
                ui::print_error(verdict);
            }
            return;
        }

        ui::print_header(&format!("Verification (size {})", report.size));
        for line in context {
            println!("{line}");
        }
        if report.passed() {
            ui::print_success(verdict);
        } else {
            ui::print_error(verdict);
        }
        if self.verbose {
            if let Some(diff) = report.relative_difference {
                println!("Relative difference: {diff:e} (tolerance {:e})", report.tolerance);
            }
        }
    }

    fn present_tables(&self, times: &TimingTable, speedups: &SpeedupReport) {
        for size in times.sizes() {
            if !self.quiet {
                ui::print_header(&format!("Speedup Table for Matrix Size {size}x{size}"));
            }
            print!("{}", size_table(size, times, &speedups.speedups));
        }
        if !self.quiet {
            for skipped in &speedups.skipped {
                ui::print_warning(&skipped.to_string());
            }
        }
    }

    fn present_warning(&self, message: &str) {
        if !self.quiet {
            ui::print_warning(message);
        }
    }

    fn present_error(&self, message: &str) {
        ui::print_error(message);
    }
}

/// Progress bar over the invocations of a sweep.
pub struct CLIProgressReporter {
    bar: ProgressBar,
}

impl CLIProgressReporter {
    /// A reporter drawing to stderr, or a hidden one when `quiet`.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
            bar.set_style(style);
            bar
        };
        Self { bar }
    }

    /// Current bar position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn start(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn report(&self, event: &SweepEvent) {
        match event {
            SweepEvent::Started { size, threads, run } => {
                self.bar
                    .set_message(format!("size {size}, {threads} threads, run {}", run + 1));
            }
            SweepEvent::Measured { .. } => self.bar.inc(1),
            SweepEvent::Missing {
                size,
                threads,
                reason,
            } => {
                let bar = &self.bar;
                if !bar.is_hidden() {
                    bar.suspend(|| {
                        ui::print_warning(&format!(
                            "Failed to extract execution time for size {size}, {threads} threads: {reason}"
                        ));
                    });
                }
                bar.inc(1);
            }
        }
    }

    fn complete(&self) {
        self.bar.finish_and_clear();
    }
}
