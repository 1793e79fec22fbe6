//! The external programs the harness drives, and where they meet.

use std::path::PathBuf;
use std::time::Duration;

use crate::invoker::StageInvoker;
use crate::process::CommandLine;
use crate::verifier::TranscriptVerifier;

pub const DEFAULT_ARTIFACT: &str = "dummy.out";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Compiler, simulator and the artifact path that connects them.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Prefix of every stage invocation; the stage flag, source and artifact are appended.
    pub compiler: CommandLine,
    /// Prefix of every simulator run; the artifact path is appended.
    pub simulator: CommandLine,
    /// Where the compiler writes its output and the simulator reads it.
    pub artifact: PathBuf,
    /// Upper bound on any single subprocess; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Echo every command to stderr before running it.
    pub verbose: bool,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: CommandLine::new("java").arg("-cp").arg("bin").arg("Main"),
            simulator: CommandLine::new("java")
                .arg("-jar")
                .arg("lib/Mars4_5.jar")
                .arg("nc"),
            artifact: PathBuf::from(DEFAULT_ARTIFACT),
            timeout: Some(DEFAULT_TIMEOUT),
            verbose: false,
        }
    }
}

impl Toolchain {
    pub fn invoker(&self) -> StageInvoker<'_> {
        StageInvoker::new(self)
    }

    pub fn verifier(&self) -> TranscriptVerifier<'_> {
        TranscriptVerifier::new(self)
    }

    pub(crate) fn echo(&self, line: &CommandLine) {
        if self.verbose {
            eprintln!("$ {line}");
        }
    }
}
