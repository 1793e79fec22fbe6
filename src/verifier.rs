//! Execution-phase checks: run the generated program under the simulator and judge it.

use std::path::Path;

use crate::errors::HarnessError;
use crate::invoker::timeout_note;
use crate::process::{self, CommandLine, Exchange, Session};
use crate::result::{StageResult, TranscriptMismatch};
use crate::stage::Step;
use crate::toolchain::Toolchain;

/// How the simulator run of a test case is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verifier {
    /// Feed `input` line by line, then require stdout to equal `expected` byte for byte.
    ExactTranscript { input: Vec<String>, expected: Vec<u8> },
    /// Run with output discarded and compare the exit code.
    ExitCodeOnly(i32),
}

impl Verifier {
    pub fn transcript<I, S>(input: I, expected: impl Into<Vec<u8>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Verifier::ExactTranscript {
            input: input.into_iter().map(Into::into).collect(),
            expected: expected.into(),
        }
    }

    /// The bytes written to stdin: each scripted line followed by a newline.
    pub fn scripted_input(&self) -> Vec<u8> {
        match self {
            Verifier::ExactTranscript { input, .. } => input
                .iter()
                .flat_map(|line| line.bytes().chain(std::iter::once(b'\n')))
                .collect(),
            Verifier::ExitCodeOnly(_) => Vec::new(),
        }
    }

    /// Judges a finished run from its exit code and captured stdout.
    pub fn accepts(&self, code: Option<i32>, stdout: &[u8]) -> bool {
        match self {
            Verifier::ExactTranscript { expected, .. } => stdout == expected.as_slice(),
            Verifier::ExitCodeOnly(expected) => code == Some(*expected),
        }
    }
}

/// Runs the simulator over the compiler's artifact.
pub struct TranscriptVerifier<'a> {
    toolchain: &'a Toolchain,
}

impl<'a> TranscriptVerifier<'a> {
    pub fn new(toolchain: &'a Toolchain) -> Self {
        Self { toolchain }
    }

    pub fn command(&self) -> CommandLine {
        self.toolchain.simulator.with_path(&self.toolchain.artifact)
    }

    /// Failures of the program under test become a failed result; only a simulator that cannot be
    /// launched at all is returned as an error.
    ///
    /// `expected` is the code the `gen` stage was expected to return. A transcript result records
    /// it so the execution line agrees with the stage line; the transcript alone decides the
    /// verdict.
    pub fn verify(&self, source: &Path, verifier: &Verifier, expected: i32) -> Result<StageResult, HarnessError> {
        let line = self.command();
        self.toolchain.echo(&line);
        let source = source.display().to_string();

        match verifier {
            Verifier::ExitCodeOnly(code) => {
                let end = match process::run_silent(&line, self.toolchain.timeout) {
                    Err(HarnessError::Wait { source: e, .. }) => {
                        let result = StageResult::compared(Step::Execute, source, None, *code, line.to_string());
                        return Ok(result.with_note(format!("lost track of `{line}`: {e}")));
                    }
                    end => end?,
                };
                let result = StageResult::compared(Step::Execute, source, end.code, *code, line.to_string());
                if end.timed_out {
                    return Ok(result.with_note(timeout_note(self.toolchain)));
                }
                Ok(result)
            }
            Verifier::ExactTranscript { expected: transcript, .. } => {
                let exchange =
                    Session::spawn(&line)?.converse(&verifier.scripted_input(), self.toolchain.timeout);
                let passed = exchange.is_complete() && verifier.accepts(exchange.code, &exchange.stdout);
                let result =
                    StageResult::judged(Step::Execute, source, exchange.code, expected, passed, line.to_string());
                Ok(self.annotate(result, &exchange, transcript))
            }
        }
    }

    fn annotate(&self, result: StageResult, exchange: &Exchange, expected: &[u8]) -> StageResult {
        if result.passed {
            return result;
        }
        if exchange.timed_out {
            return result.with_note(timeout_note(self.toolchain));
        }
        let problem = exchange
            .wait_error
            .as_ref()
            .or(exchange.input_error.as_ref())
            .or(exchange.output_error.as_ref());
        if let Some(problem) = problem {
            return result.with_note(problem.clone());
        }

        let result = result.with_transcript(TranscriptMismatch {
            expected: String::from_utf8_lossy(expected).into_owned(),
            actual: String::from_utf8_lossy(&exchange.stdout).into_owned(),
        });
        let mut notes = Vec::new();
        if exchange.signalled() {
            notes.push("terminated by a signal".to_string());
        }
        if let Some(closed) = &exchange.input_closed {
            notes.push(closed.clone());
        }
        if !exchange.stderr.is_empty() {
            notes.push(format!(
                "stderr: {}",
                String::from_utf8_lossy(&exchange.stderr).trim_end()
            ));
        }
        if notes.is_empty() {
            return result;
        }
        result.with_note(notes.join("; "))
    }
}
