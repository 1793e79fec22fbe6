//! Subprocess plumbing shared by the stage invoker and the transcript verifier.
//!
//! Two shapes of invocation exist. [`run_silent`] runs a command with every standard stream
//! discarded and reports only how it ended. [`Session`] owns a child whose streams are piped,
//! feeds it scripted input and drains its output. Both bound the wait by an optional timeout and
//! kill the child once it expires.

use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::errors::HarnessError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// COMMAND LINES
// ============================================================================

/// A program plus its leading arguments, e.g. `java -cp bin Main`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Splits a whitespace separated command such as `"ant build"`.
    pub fn parse(line: &str, role: &'static str) -> Result<Self, HarnessError> {
        Self::from_parts(line.split_whitespace().map(str::to_string).collect(), role)
    }

    pub fn from_parts(mut parts: Vec<String>, role: &'static str) -> Result<Self, HarnessError> {
        if parts.is_empty() {
            return Err(HarnessError::EmptyCommand { role });
        }
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Returns a copy with `extra` appended after the existing arguments.
    pub fn with_args<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut line = self.clone();
        line.args.extend(extra.into_iter().map(Into::into));
        line
    }

    pub fn with_path(&self, path: &Path) -> Self {
        self.with_args([path.display().to_string()])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl TryFrom<Vec<String>> for CommandLine {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        CommandLine::from_parts(parts, "manifest").map_err(|e| e.to_string())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ============================================================================
// SILENT RUNS
// ============================================================================

/// How a subprocess ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    /// Exit code; `None` when a signal ended the process.
    pub code: Option<i32>,
    pub timed_out: bool,
}

impl Termination {
    fn from_status(status: Option<ExitStatus>) -> Self {
        match status {
            Some(status) => Termination {
                code: status.code(),
                timed_out: false,
            },
            None => Termination {
                code: None,
                timed_out: true,
            },
        }
    }
}

/// Runs `line` to completion with stdin, stdout and stderr all discarded.
pub fn run_silent(line: &CommandLine, timeout: Option<Duration>) -> Result<Termination, HarnessError> {
    let mut child = line
        .command()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| HarnessError::Launch {
            command: line.to_string(),
            source,
        })?;
    let status = wait_bounded(&mut child, timeout).map_err(|source| HarnessError::Wait {
        command: line.to_string(),
        source,
    })?;
    Ok(Termination::from_status(status))
}

/// Runs `line` with inherited standard streams, for steps whose output the user should see.
pub fn run_inherited(line: &CommandLine) -> Result<Termination, HarnessError> {
    let status = line.command().status().map_err(|source| HarnessError::Launch {
        command: line.to_string(),
        source,
    })?;
    Ok(Termination::from_status(Some(status)))
}

/// Waits for `child`; returns `Ok(None)` if `timeout` elapsed and the child had to be killed.
fn wait_bounded(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // The child may exit between try_wait and kill; either way it is gone after wait.
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

// ============================================================================
// INTERACTIVE SESSIONS
// ============================================================================

/// Everything observed during one scripted exchange.
#[derive(Debug, Default)]
pub struct Exchange {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
    /// Set when the program exited on its own before reading all scripted input.
    ///
    /// Not a failure: the output alone decides the verdict.
    pub input_closed: Option<String>,
    /// Set when the scripted input could not be delivered for any other reason.
    pub input_error: Option<String>,
    /// Set when an output stream could not be drained.
    pub output_error: Option<String>,
    /// Set when waiting for the program failed; the program was killed.
    pub wait_error: Option<String>,
}

impl Exchange {
    /// True when the exchange ran to its natural end with nothing lost.
    pub fn is_complete(&self) -> bool {
        !self.timed_out
            && self.input_error.is_none()
            && self.output_error.is_none()
            && self.wait_error.is_none()
    }

    /// True when a signal, rather than a timeout, ended the program.
    pub fn signalled(&self) -> bool {
        self.code.is_none() && !self.timed_out && self.wait_error.is_none()
    }
}

/// A child process with all three standard streams piped.
///
/// Dropping a session kills and reaps the child if it is still running, so a panic or early
/// return while talking to it never leaks a process.
pub struct Session {
    child: Child,
    command: String,
}

impl Session {
    pub fn spawn(line: &CommandLine) -> Result<Self, HarnessError> {
        let child = line
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| HarnessError::Launch {
                command: line.to_string(),
                source,
            })?;
        Ok(Self {
            child,
            command: line.to_string(),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Writes `input`, closes stdin, drains both output streams and waits for exit.
    ///
    /// Feeding and draining happen on helper threads so neither side can stall on a full pipe.
    /// Whatever goes wrong with the program is recorded in the returned [`Exchange`].
    pub fn converse(mut self, input: &[u8], timeout: Option<Duration>) -> Exchange {
        let writer = self.child.stdin.take().map(|mut stdin| {
            let input = input.to_vec();
            // stdin is dropped, and so closed, when the thread finishes.
            thread::spawn(move || stdin.write_all(&input).and_then(|_| stdin.flush()))
        });
        let stdout = self.child.stdout.take().map(drain::<ChildStdout>);
        let stderr = self.child.stderr.take().map(drain::<ChildStderr>);

        // A grandchild may still hold the pipes open after a kill; on the early returns below
        // the helpers are left detached.
        let status = match wait_bounded(&mut self.child, timeout) {
            Ok(status) => status,
            Err(e) => {
                return Exchange {
                    wait_error: Some(format!("lost track of `{}`: {e}", self.command)),
                    ..Exchange::default()
                };
            }
        };
        let mut exchange = Exchange {
            code: status.and_then(|s| s.code()),
            timed_out: status.is_none(),
            ..Exchange::default()
        };
        if exchange.timed_out {
            return exchange;
        }

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                    exchange.input_closed = Some(format!("program stopped reading input: {e}"));
                }
                Ok(Err(e)) => exchange.input_error = Some(format!("stdin closed early: {e}")),
                Err(_) => exchange.input_error = Some("stdin writer panicked".to_string()),
            }
        }
        let (out, out_err) = collect(stdout, "stdout");
        let (err, err_err) = collect(stderr, "stderr");
        exchange.stdout = out;
        exchange.stderr = err;
        exchange.output_error = out_err.or(err_err);
        exchange
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !matches!(self.child.try_wait(), Ok(Some(_))) {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn drain<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    name: &str,
) -> (Vec<u8>, Option<String>) {
    match handle.map(JoinHandle::join) {
        None => (Vec::new(), None),
        Some(Ok(Ok(buf))) => (buf, None),
        Some(Ok(Err(e))) => (Vec::new(), Some(format!("reading {name} failed: {e}"))),
        Some(Err(_)) => (Vec::new(), Some(format!("{name} reader panicked"))),
    }
}
