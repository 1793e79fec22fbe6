//! Recorded outcomes of stage invocations and execution checks.

use std::fmt;

use serde::Serialize;

use crate::stage::Step;

/// A transcript that did not match, kept for diff reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptMismatch {
    pub expected: String,
    pub actual: String,
}

/// The recorded outcome of one stage invocation or one execution check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub step: Step,
    pub source: String,
    /// Observed exit code; `None` when the process was killed.
    pub actual: Option<i32>,
    pub expected: i32,
    pub passed: bool,
    pub command: String,
    /// Extra context for a failed execution check: timeout, broken pipe, stray stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<TranscriptMismatch>,
}

impl StageResult {
    /// A result that passes exactly when the observed code equals the expected one.
    pub fn compared(
        step: Step,
        source: impl Into<String>,
        actual: Option<i32>,
        expected: i32,
        command: impl Into<String>,
    ) -> Self {
        Self {
            step,
            source: source.into(),
            actual,
            expected,
            passed: actual == Some(expected),
            command: command.into(),
            note: None,
            transcript: None,
        }
    }

    /// A result whose verdict was reached by some other judgement, such as a transcript check.
    pub fn judged(
        step: Step,
        source: impl Into<String>,
        actual: Option<i32>,
        expected: i32,
        passed: bool,
        command: impl Into<String>,
    ) -> Self {
        Self {
            passed,
            ..Self::compared(step, source, actual, expected, command)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_transcript(mut self, mismatch: TranscriptMismatch) -> Self {
        self.transcript = Some(mismatch);
        self
    }

    pub fn status(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// `"PASS, path: tests/x.c, return: 0, expected: 0 | java -cp bin Main -gen tests/x.c dummy.out"`
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// The description without its leading status.
    pub fn details(&self) -> String {
        let actual = match self.actual {
            Some(code) => code.to_string(),
            None => "killed".to_string(),
        };
        format!(
            "path: {}, return: {}, expected: {} | {}",
            self.source, actual, self.expected, self.command
        )
    }
}

impl fmt::Display for StageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.status(), self.details())
    }
}
