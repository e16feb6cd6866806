//! The measurement sweep: every size against every thread count.

use rand::Rng;
use serde::{Deserialize, Serialize};

use parbench_core::launch::{CommandSpec, InputSource, Invocation, Mode};
use parbench_core::measurement::{Measurement, TimingTable};
use parbench_core::parser::parse_output;
use parbench_core::progress::CancellationToken;

use crate::interfaces::{ProgramRunner, ProgressReporter, RunError, SweepEvent};

/// How each sweep invocation gets its input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Let the program seed itself.
    Program,
    /// Pass a fresh random seed on every invocation.
    Random,
    /// Pass the same seed on every invocation.
    Fixed(u64),
    /// Every invocation reads the generated data files.
    Files,
}

impl SeedPolicy {
    fn next_input(self, rng: &mut impl Rng) -> InputSource {
        match self {
            Self::Program => InputSource::Generated,
            // The programs parse the seed as a C int.
            Self::Random => InputSource::Seeded(u64::from(rng.gen::<u32>() >> 1)),
            Self::Fixed(seed) => InputSource::Seeded(seed),
            Self::Files => InputSource::Files,
        }
    }
}

/// Everything needed to run a sweep.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub mode: Mode,
    pub program: String,
    pub sizes: Vec<usize>,
    pub threads: Vec<usize>,
    /// Repetitions per configuration; the median is kept.
    pub runs: usize,
    pub seeding: SeedPolicy,
    pub extra_args: Vec<String>,
}

impl SweepPlan {
    /// Number of invocations the sweep will perform.
    #[must_use]
    pub fn total_invocations(&self) -> usize {
        self.sizes.len() * self.threads.len() * self.runs
    }

    /// Command for one invocation of the program.
    #[must_use]
    pub fn command(&self, invocation: &Invocation) -> CommandSpec {
        CommandSpec::build(&self.mode, &self.program, invocation, &self.extra_args)
    }
}

/// One invocation's parsed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub size: usize,
    pub threads: usize,
    pub run: usize,
    pub execution_time: Option<f64>,
    pub result: Option<f64>,
    pub exit_code: Option<i32>,
    /// Wall-clock seconds seen by the harness.
    pub wall_time: f64,
}

/// A configuration run that produced no execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingPoint {
    pub size: usize,
    pub threads: usize,
    pub run: usize,
    pub reason: String,
}

/// What a sweep collected.
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    pub times: TimingTable,
    pub samples: Vec<Sample>,
    pub missing: Vec<MissingPoint>,
    /// Whether the sweep stopped early on cancellation.
    pub cancelled: bool,
}

/// Run every configuration in `plan`, sequentially and in order.
///
/// Invocations without an `Execution Time` line are reported and omitted;
/// a configuration with no usable run gets no entry in the timing table.
pub fn execute_sweep(
    plan: &SweepPlan,
    runner: &dyn ProgramRunner,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();
    let mut rng = rand::thread_rng();
    reporter.start(plan.total_invocations() as u64);

    'sweep: for &size in &plan.sizes {
        for &threads in &plan.threads {
            let mut seconds = Vec::with_capacity(plan.runs);

            for run in 0..plan.runs {
                if cancel.is_cancelled() {
                    outcome.cancelled = true;
                }
                if outcome.cancelled {
                    record(&mut outcome.times, size, threads, &seconds);
                    break 'sweep;
                }

                let invocation = Invocation {
                    threads,
                    size,
                    input: plan.seeding.next_input(&mut rng),
                };
                let spec = plan.command(&invocation);
                tracing::debug!(command = %spec, run, "invoking program");
                reporter.report(&SweepEvent::Started { size, threads, run });

                match runner.run(&spec, cancel) {
                    Ok(output) => {
                        let parsed = parse_output(&output.stdout);
                        outcome.samples.push(Sample {
                            size,
                            threads,
                            run,
                            execution_time: parsed.execution_time,
                            result: parsed.result,
                            exit_code: output.exit_code,
                            wall_time: output.wall_time.as_secs_f64(),
                        });
                        if let Some(secs) = parsed.execution_time {
                            seconds.push(secs);
                            reporter.report(&SweepEvent::Measured {
                                size,
                                threads,
                                seconds: secs,
                            });
                        } else {
                            let reason = match output.exit_code {
                                Some(0) => "no execution time in output".to_string(),
                                Some(code) => {
                                    format!("no execution time in output (exit code {code})")
                                }
                                None => "no execution time in output (killed by signal)"
                                    .to_string(),
                            };
                            miss(&mut outcome, reporter, size, threads, run, reason);
                        }
                    }
                    Err(RunError::Cancelled) => {
                        outcome.cancelled = true;
                    }
                    Err(e) => miss(&mut outcome, reporter, size, threads, run, e.to_string()),
                }
            }

            record(&mut outcome.times, size, threads, &seconds);
            if outcome.cancelled {
                break 'sweep;
            }
        }
    }

    reporter.complete();
    tracing::info!(
        measured = outcome.times.len(),
        missing = outcome.missing.len(),
        cancelled = outcome.cancelled,
        "sweep finished"
    );
    outcome
}

fn record(times: &mut TimingTable, size: usize, threads: usize, seconds: &[f64]) {
    if let Some(measurement) = Measurement::from_samples(seconds) {
        times.insert(size, threads, measurement);
    }
}

fn miss(
    outcome: &mut SweepOutcome,
    reporter: &dyn ProgressReporter,
    size: usize,
    threads: usize,
    run: usize,
    reason: String,
) {
    tracing::warn!(size, threads, run, %reason, "failed to extract execution time");
    reporter.report(&SweepEvent::Missing {
        size,
        threads,
        reason: reason.clone(),
    });
    outcome.missing.push(MissingPoint {
        size,
        threads,
        run,
        reason,
    });
}
