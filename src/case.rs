//! Declarative conformance checks and their recorded outcomes.
//!
//! A [`TestCase`] is built once with its full configuration and consumed by [`TestCase::run`],
//! which hands back a [`CaseReport`]. Running consumes the case, so the same external processes
//! can never be driven twice for one case and a half-filled result list is never observable.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::result::StageResult;
use crate::stage::{Stage, Step};
use crate::toolchain::Toolchain;
use crate::verifier::Verifier;

/// Expected exit codes: one code for every stage, or one per stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    Uniform(i32),
    PerStage(Vec<i32>),
}

impl Expected {
    /// Expands to exactly one code per stage, in stage order.
    fn resolve(self, source: &Path, stages: &[Stage]) -> Result<Vec<i32>, HarnessError> {
        let codes = match self {
            Expected::Uniform(code) => vec![code; stages.len()],
            Expected::PerStage(codes) => codes,
        };
        if codes.len() != stages.len() {
            return Err(HarnessError::ExpectationLength {
                source_path: source.display().to_string(),
                stages: stages.len(),
                expected: codes.len(),
            });
        }
        Ok(codes)
    }
}

impl From<i32> for Expected {
    fn from(code: i32) -> Self {
        Expected::Uniform(code)
    }
}

impl From<Vec<i32>> for Expected {
    fn from(codes: Vec<i32>) -> Self {
        Expected::PerStage(codes)
    }
}

impl<const N: usize> From<[i32; N]> for Expected {
    fn from(codes: [i32; N]) -> Self {
        Expected::PerStage(codes.to_vec())
    }
}

/// One conformance scenario: a source program, the stages to run it through, what each stage
/// should return, and optionally how to judge the generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    source: PathBuf,
    stages: Vec<Stage>,
    expected: Vec<i32>,
    verifier: Option<Verifier>,
}

impl TestCase {
    /// Fails before anything runs when `expected` does not line up with `stages`.
    pub fn new(
        source: impl Into<PathBuf>,
        expected: impl Into<Expected>,
        stages: impl Into<Vec<Stage>>,
    ) -> Result<Self, HarnessError> {
        let source = source.into();
        let stages = stages.into();
        if stages.is_empty() {
            return Err(HarnessError::NoStages {
                source_path: source.display().to_string(),
            });
        }
        let expected = expected.into().resolve(&source, &stages)?;
        Ok(Self {
            source,
            stages,
            expected,
            verifier: None,
        })
    }

    /// A case run through the whole pipeline with the same expected code at every stage.
    pub fn pipeline(source: impl Into<PathBuf>, code: i32) -> Self {
        let source = source.into();
        let stages = Stage::ALL.to_vec();
        let expected = vec![code; stages.len()];
        Self {
            source,
            stages,
            expected,
            verifier: None,
        }
    }

    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Judges the generated program by its exact output after feeding it `input`.
    pub fn with_transcript<I, S>(self, input: I, expected: impl Into<Vec<u8>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_verifier(Verifier::transcript(input, expected))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn expected(&self) -> &[i32] {
        &self.expected
    }

    /// The verifier used once code generation succeeds. Without an explicit one the simulator's
    /// exit code is compared to the final stage's expected code.
    pub fn verifier(&self) -> Verifier {
        match &self.verifier {
            Some(verifier) => verifier.clone(),
            None => Verifier::ExitCodeOnly(self.expected.last().copied().unwrap_or_default()),
        }
    }

    /// Runs every stage in order, then the execution check if `gen` exited with 0.
    ///
    /// The check is gated on the observed code alone: a `gen` stage expected to fail that
    /// nevertheless succeeds is recorded as a mismatch and its output is still executed.
    pub fn run(self, toolchain: &Toolchain) -> Result<CaseReport, HarnessError> {
        let invoker = toolchain.invoker();
        let mut results = Vec::with_capacity(self.stages.len() + 1);
        for (stage, expected) in self.stages.iter().zip(&self.expected) {
            results.push(invoker.invoke(*stage, &self.source, *expected)?);
        }

        let generated = results
            .iter()
            .rev()
            .find(|r| r.step == Step::Stage(Stage::Gen))
            .filter(|r| r.actual == Some(0))
            .map(|r| r.expected);
        if let Some(expected) = generated {
            let verifier = self.verifier();
            results.push(toolchain.verifier().verify(&self.source, &verifier, expected)?);
        }

        Ok(CaseReport {
            source: self.source.display().to_string(),
            results,
        })
    }
}

/// Everything one test case recorded, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub source: String,
    pub results: Vec<StageResult>,
}

impl CaseReport {
    pub fn succ_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.count() - self.succ_count()
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn executed(&self) -> bool {
        self.results.iter().any(|r| r.step == Step::Execute)
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{result}")?;
        }
        Ok(())
    }
}
