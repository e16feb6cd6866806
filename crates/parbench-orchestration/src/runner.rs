//! Child-process runner for the external program.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender};

use parbench_core::launch::CommandSpec;
use parbench_core::progress::CancellationToken;

use crate::interfaces::{ProgramRunner, RunError, RunOutput};

/// Interval between exit checks while a child is running.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output may keep trickling in after the child exits. Background
/// processes that inherited the pipes can hold them open indefinitely.
const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Runs commands as child processes, capturing both output streams.
///
/// The child's pipes are drained on reader threads so a chatty program can
/// never block on a full pipe while the harness waits for it to exit.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    poll_interval: Duration,
    drain_grace: Duration,
}

impl ProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }

    /// Kill any run that exceeds `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Stop collecting output this long after the child exits.
    #[must_use]
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = (Stream, Vec<u8>);

fn spawn_reader<R>(source: Option<R>, stream: Stream, tx: Sender<Chunk>)
where
    R: Read + Send + 'static,
{
    let Some(mut source) = source else {
        return;
    };
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send((stream, buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::debug!(?stream, error = %e, "pipe read failed");
                    break;
                }
            }
        }
    });
}

#[derive(Default)]
struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl Captured {
    fn absorb(&mut self, (stream, bytes): Chunk) {
        match stream {
            Stream::Stdout => self.stdout.extend_from_slice(&bytes),
            Stream::Stderr => self.stderr.extend_from_slice(&bytes),
        }
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "kill failed, child already exited");
    }
    let _ = child.wait();
}

impl ProgramRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec, cancel: &CancellationToken) -> Result<RunOutput, RunError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let deadline = self.timeout.map(|limit| start + limit);
        let mut child = command.spawn().map_err(|source| RunError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let (tx, rx) = crossbeam_channel::unbounded();
        spawn_reader(child.stdout.take(), Stream::Stdout, tx.clone());
        spawn_reader(child.stderr.take(), Stream::Stderr, tx);

        let mut captured = Captured::default();
        let mut pipes_open = true;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if cancel.is_cancelled() {
                kill(&mut child);
                return Err(RunError::Cancelled);
            }
            if let (Some(limit), Some(deadline)) = (self.timeout, deadline) {
                if Instant::now() > deadline {
                    tracing::warn!(command = %spec, ?limit, "run timed out, killing child");
                    kill(&mut child);
                    return Err(RunError::Timeout(limit));
                }
            }
            if pipes_open {
                match rx.recv_timeout(self.poll_interval) {
                    Ok(chunk) => captured.absorb(chunk),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => pipes_open = false,
                }
            } else {
                thread::sleep(self.poll_interval);
            }
        };
        let wall_time = start.elapsed();

        // The child is gone; whatever still holds its pipes gets a bounded wait.
        let exited = Instant::now();
        let drain_until = match deadline {
            Some(deadline) => deadline.min(exited + self.drain_grace),
            None => exited + self.drain_grace,
        };
        while pipes_open {
            if cancel.is_cancelled() {
                return Err(RunError::Cancelled);
            }
            let now = Instant::now();
            if now >= drain_until {
                tracing::warn!(
                    command = %spec,
                    "output pipes still open after exit, keeping partial output"
                );
                break;
            }
            match rx.recv_timeout((drain_until - now).min(self.poll_interval)) {
                Ok(chunk) => captured.absorb(chunk),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => pipes_open = false,
            }
        }

        let output = RunOutput {
            exit_code: status.code(),
            success: status.success(),
            wall_time,
            stdout: String::from_utf8_lossy(&captured.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&captured.stderr).into_owned(),
        };

        if !output.success {
            tracing::warn!(
                command = %spec,
                exit_code = ?output.exit_code,
                stderr = output.stderr.trim(),
                "program exited unsuccessfully"
            );
        }
        Ok(output)
    }
}
