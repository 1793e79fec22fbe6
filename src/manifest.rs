//! YAML suite manifests.
//!
//! A manifest replaces the built-in corpus and may override the toolchain:
//!
//! ```yaml
//! toolchain:
//!   compiler: [java, -cp, bin, Main]
//!   simulator: [java, -jar, lib/Mars4_5.jar, nc]
//!   artifact: dummy.out
//!   build: [ant, build]
//!   timeout_secs: 60          # 0 waits forever
//! cases:
//!   - source: tests/fibonacci.c
//!     expect: 0               # one code for every stage, or a list with one per stage
//!     transcript:
//!       input: ["12"]
//!       output: "First 12 terms of Fibonacci series are : 0 1 1 2 3 5 8 13 21 34 55 89 \n"
//!   - source: tests/while-loop-wrong.c
//!     stages: [parser]
//!     expect: [245]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::case::{Expected, TestCase};
use crate::errors::HarnessError;
use crate::process::CommandLine;
use crate::stage::Stage;
use crate::suite::Suite;
use crate::toolchain::Toolchain;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub toolchain: ToolchainSection,
    pub cases: Vec<CaseEntry>,
}

/// Toolchain overrides; anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSection {
    pub compiler: Option<CommandLine>,
    pub simulator: Option<CommandLine>,
    pub artifact: Option<PathBuf>,
    pub build: Option<CommandLine>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseEntry {
    pub source: PathBuf,
    pub expect: Expected,
    /// Defaults to the whole pipeline.
    pub stages: Option<Vec<Stage>>,
    pub transcript: Option<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub input: Vec<String>,
    pub output: String,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let content = fs::read_to_string(path).map_err(|source| HarnessError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    pub fn parse(name: &str, content: &str) -> Result<Self, HarnessError> {
        serde_yaml::from_str(content).map_err(|e| HarnessError::manifest(name, content, &e))
    }

    /// Builds the cases in manifest order, validating each one.
    pub fn suite(&self) -> Result<Suite, HarnessError> {
        let cases = self
            .cases
            .iter()
            .map(CaseEntry::to_case)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Suite::new(cases))
    }

    pub fn apply(&self, toolchain: &mut Toolchain) {
        let section = &self.toolchain;
        if let Some(compiler) = &section.compiler {
            toolchain.compiler = compiler.clone();
        }
        if let Some(simulator) = &section.simulator {
            toolchain.simulator = simulator.clone();
        }
        if let Some(artifact) = &section.artifact {
            toolchain.artifact = artifact.clone();
        }
        if let Some(secs) = section.timeout_secs {
            toolchain.timeout = timeout_from_secs(secs);
        }
    }

    pub fn build(&self) -> Option<&CommandLine> {
        self.toolchain.build.as_ref()
    }
}

impl CaseEntry {
    fn to_case(&self) -> Result<TestCase, HarnessError> {
        let stages = self.stages.clone().unwrap_or_else(|| Stage::ALL.to_vec());
        let case = TestCase::new(self.source.clone(), self.expect.clone(), stages)?;
        Ok(match &self.transcript {
            Some(t) => case.with_transcript(t.input.clone(), t.output.clone()),
            None => case,
        })
    }
}

/// `0` means no limit.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
