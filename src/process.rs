//! Child process execution.
//!
//! All OS interaction in burrow happens through spawned child processes with
//! captured stdout/stderr and exit status; burrow never forks itself and
//! never mutates the calling shell. Timeouts are enforced by polling the
//! child and killing it when the deadline passes, not by cooperative
//! cancellation.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between liveness checks while waiting on a child.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of executing a child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (None if killed by signal or by timeout).
    pub exit_code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the process was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl ProcessOutput {
    /// Whether the process ran to completion with exit code 0.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// The last `max_lines` lines of stderr, for error reporting.
    ///
    /// Falls back to the stdout tail when stderr is empty; some tools write
    /// their diagnostics to stdout.
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = source.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }

    /// Human-readable description of how the process ended.
    pub fn status_detail(&self) -> String {
        if self.timed_out {
            format!("timed out after {}s", self.duration.as_secs())
        } else {
            match self.exit_code {
                Some(code) => format!("exited with status {code}"),
                None => "killed by signal".to_string(),
            }
        }
    }
}

/// Options for process execution.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Kill the child after this long (None = wait indefinitely).
    pub timeout: Option<Duration>,
}

impl RunOptions {
    /// Options with a timeout and no working-directory override.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cwd: None,
            timeout: Some(timeout),
        }
    }
}

/// Run a pre-configured command to completion, capturing its output.
///
/// Stdout and stderr are drained on dedicated threads so a chatty child
/// cannot deadlock against a full pipe buffer while we wait on it. The
/// returned error covers spawn failures only (program missing,
/// permissions); a non-zero exit or timeout is reported in the output.
pub fn run(mut command: Command, options: &RunOptions) -> std::io::Result<ProcessOutput> {
    let start = Instant::now();

    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = command.spawn()?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    });

    let mut timed_out = false;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break Some(status),
            None => {
                if let Some(timeout) = options.timeout {
                    if start.elapsed() > timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        timed_out = true;
                        break None;
                    }
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    Ok(ProcessOutput {
        exit_code: status.and_then(|s| s.code()),
        stdout,
        stderr,
        duration: start.elapsed(),
        timed_out,
    })
}
