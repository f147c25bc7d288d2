//! External command execution for command-backed resolutions
//!
//! A command is only run when its first word names an executable that
//! actually exists, either as an absolute path or somewhere on the search
//! path. Output is captured from stdout with trailing whitespace removed.
//! An empty result, a missing executable and a failed run all come back as
//! `None`; failures are logged, never raised.

use std::io::{self, Read};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};

/// Interpreter used when a resolution does not name one
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How commands are run for a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSettings {
    /// Interpreter for resolutions that store a command without one
    pub default_interpreter: String,
    /// Upper bound on a single command; `None` blocks until it exits
    pub timeout: Option<Duration>,
}

impl Default for ExecSettings {
    fn default() -> Self {
        Self {
            default_interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout: None,
        }
    }
}

/// Reasons a located command produced no output
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start '{interpreter}': {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for command: {0}")]
    Wait(#[from] io::Error),

    #[error("command exited with {status}: {stderr}")]
    ExitStatus { status: ExitStatus, stderr: String },

    #[error("command timed out after {0}ms")]
    Timeout(u128),
}

struct Captured {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Locate the executable named by the first word of `command`.
pub fn locate_executable(command: &str) -> Option<PathBuf> {
    let binary = command.split_whitespace().next()?;
    let path = if binary.starts_with('/') {
        PathBuf::from(binary)
    } else {
        which::which(binary).ok()?
    };
    path.exists().then_some(path)
}

/// Run `command` through `interpreter` and return its trimmed stdout.
pub fn run_command(command: &str, interpreter: &str, timeout: Option<Duration>) -> Option<String> {
    if locate_executable(command).is_none() {
        log_event_with_fields(Event::CommandNotFound, &[("command", command)]);
        return None;
    }

    match execute(command, interpreter, timeout) {
        Ok(out) if out.is_empty() => None,
        Ok(out) => Some(out),
        Err(e) => {
            let event = match e {
                ExecError::Timeout(_) => Event::CommandTimeout,
                _ => Event::CommandFailed,
            };
            let detail = e.to_string();
            log_event_with_fields(
                event,
                &[("command", command), ("error", &detail), ("interpreter", interpreter)],
            );
            None
        }
    }
}

fn execute(command: &str, interpreter: &str, timeout: Option<Duration>) -> Result<String, ExecError> {
    let mut cmd = Command::new(interpreter);
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // a bounded command leads its own process group so a timeout reaches
    // everything it started
    #[cfg(unix)]
    {
        if timeout.is_some() {
            cmd.process_group(0);
        }
    }

    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        interpreter: interpreter.to_string(),
        source,
    })?;

    let captured = match timeout {
        None => {
            let output = child.wait_with_output()?;
            Captured {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            }
        }
        Some(limit) => wait_bounded(child, limit)?,
    };

    if !captured.status.success() {
        return Err(ExecError::ExitStatus {
            status: captured.status,
            stderr: String::from_utf8_lossy(&captured.stderr).trim_end().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&captured.stdout).trim_end().to_string())
}

/// Wait for `child` and its output, killing its process group once `limit`
/// has passed.
///
/// Pipes are drained on helper threads so a chatty child cannot block on a
/// full pipe while we poll. Background processes keep the pipes open after
/// the interpreter exits, so collecting output shares the same deadline.
fn wait_bounded(mut child: Child, limit: Duration) -> Result<Captured, ExecError> {
    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let deadline = Instant::now() + limit;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            terminate(&mut child);
            return Err(ExecError::Timeout(limit.as_millis()));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = collect(stdout_reader, deadline);
    let stderr = collect(stderr_reader, deadline);
    match (stdout, stderr) {
        (Some(stdout), Some(stderr)) => Ok(Captured {
            status,
            stdout,
            stderr,
        }),
        _ => {
            terminate(&mut child);
            Err(ExecError::Timeout(limit.as_millis()))
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

/// Output from a drain thread, or `None` if it is not done by `deadline`
fn collect(reader: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<Vec<u8>> {
    let Some(reader) = reader else {
        return Some(Vec::new());
    };
    match reader.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// Kill the child's process group, then the child itself.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: the child leads a group created for this command alone
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
