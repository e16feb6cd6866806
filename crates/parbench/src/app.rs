//! Application entry point and dispatch.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use parbench_cli::chart::write_charts;
use parbench_cli::output::format_duration;
use parbench_cli::presenter::{CLIProgressReporter, CLIResultPresenter};
use parbench_cli::ui;
use parbench_core::constants::exit_codes;
use parbench_core::datagen::generate_and_save;
use parbench_core::measurement::TimingTable;
use parbench_core::progress::CancellationToken;
use parbench_core::speedup::{compute_speedups, SpeedupReport};
use parbench_orchestration::interfaces::ResultPresenter;
use parbench_orchestration::runner::ProcessRunner;
use parbench_orchestration::sweep::execute_sweep;
use parbench_orchestration::verification::{verify, VerificationStatus};
use parbench_report::{load_report, save_report, HostInfo, SweepReport};

use crate::config::AppConfig;

/// How a run that did not fail outright ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The sweep collected no execution time at all.
    NoResults,
    /// The parallel verification result disagreed with the sequential one.
    Mismatch,
    /// Interrupted; partial results were still reported.
    Cancelled,
}

impl RunStatus {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Completed => exit_codes::SUCCESS,
            Self::NoResults => exit_codes::ERROR_NO_RESULTS,
            Self::Mismatch => exit_codes::ERROR_MISMATCH,
            Self::Cancelled => exit_codes::ERROR_CANCELED,
        }
    }
}

/// Run the application.
pub fn run(config: &AppConfig) -> Result<RunStatus> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        parbench_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(RunStatus::Completed);
    }

    if let Some(path) = &config.replot {
        return replot(config, path);
    }

    run_benchmark(config)
}

fn run_benchmark(config: &AppConfig) -> Result<RunStatus> {
    let settings = config.settings()?;
    let plan = &settings.plan;
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);

    if settings.inserted_baseline {
        presenter.present_warning("thread list has no single-thread baseline; adding 1");
    }
    tracing::debug!(?plan, "benchmark plan");

    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());
    let runner = ProcessRunner::new().with_timeout(settings.timeout);

    if let Some((size, seed)) = settings.data {
        generate_and_save(&config.data_dir, size, seed).with_context(|| {
            format!("failed to write data files to {}", config.data_dir.display())
        })?;
    }

    let verification = match &settings.verification {
        Some(vplan) => {
            let report = verify(plan, vplan, &runner, &cancel)?;
            presenter.present_verification(&report);
            Some(report)
        }
        None => None,
    };

    let reporter = CLIProgressReporter::new(config.quiet);
    let started = Instant::now();
    let outcome = execute_sweep(plan, &runner, &reporter, &cancel);
    if !config.quiet {
        println!("Sweep finished in {}", format_duration(started.elapsed()));
    }
    if outcome.cancelled {
        presenter.present_warning("benchmark cancelled; reporting partial results");
    }

    let speedups = compute_speedups(&outcome.times);
    if outcome.times.is_empty() {
        presenter.present_error("no execution times were collected");
    } else {
        presenter.present_tables(&outcome.times, &speedups);
        if !config.no_charts {
            render_charts(config, &outcome.times, &speedups)?;
        }
    }

    if let Some(path) = &config.json {
        let report = SweepReport::new(
            plan,
            &outcome,
            &speedups,
            verification.clone(),
            HostInfo::detect(),
        );
        save_report(&report, path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    let mismatch = verification
        .as_ref()
        .is_some_and(|v| v.status == VerificationStatus::Mismatch);
    let status = if outcome.cancelled {
        RunStatus::Cancelled
    } else if outcome.times.is_empty() {
        RunStatus::NoResults
    } else if mismatch {
        RunStatus::Mismatch
    } else {
        RunStatus::Completed
    };
    Ok(status)
}

fn replot(config: &AppConfig, path: &Path) -> Result<RunStatus> {
    let report = load_report(path)
        .with_context(|| format!("failed to load report {}", path.display()))?;
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);

    if let Some(verification) = &report.verification {
        presenter.present_verification(verification);
    }
    if report.times.is_empty() {
        presenter.present_error("report holds no execution times");
        return Ok(RunStatus::NoResults);
    }

    let speedups = report.recompute_speedups();
    presenter.present_tables(&report.times, &speedups);
    if !config.no_charts {
        render_charts(config, &report.times, &speedups)?;
    }
    Ok(RunStatus::Completed)
}

fn render_charts(config: &AppConfig, times: &TimingTable, speedups: &SpeedupReport) -> Result<()> {
    let files = write_charts(&config.output_dir, times, &speedups.speedups).with_context(|| {
        format!("failed to write charts to {}", config.output_dir.display())
    })?;
    if !config.quiet {
        for file in &files {
            ui::print_success(&format!("Chart saved to {}", file.display()));
        }
    }
    Ok(())
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || {
        cancel.cancel();
    }) {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }
}
