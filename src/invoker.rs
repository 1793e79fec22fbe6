//! Runs a single compiler stage and records how it ended.

use std::path::Path;

use crate::errors::HarnessError;
use crate::process::{self, CommandLine};
use crate::result::StageResult;
use crate::stage::{Stage, Step};
use crate::toolchain::Toolchain;

/// Invokes `<compiler> -<stage> <source> <artifact>` and compares its exit code.
pub struct StageInvoker<'a> {
    toolchain: &'a Toolchain,
}

impl<'a> StageInvoker<'a> {
    pub fn new(toolchain: &'a Toolchain) -> Self {
        Self { toolchain }
    }

    pub fn command(&self, stage: Stage, source: &Path) -> CommandLine {
        self.toolchain
            .compiler
            .with_args([stage.flag()])
            .with_path(source)
            .with_path(&self.toolchain.artifact)
    }

    /// Output of the compiler is discarded; only its exit code is observed.
    ///
    /// A compiler that cannot be started is an error, not a mismatch.
    pub fn invoke(&self, stage: Stage, source: &Path, expected: i32) -> Result<StageResult, HarnessError> {
        let line = self.command(stage, source);
        self.toolchain.echo(&line);
        let end = process::run_silent(&line, self.toolchain.timeout)?;
        let result = StageResult::compared(
            Step::Stage(stage),
            source.display().to_string(),
            end.code,
            expected,
            line.to_string(),
        );
        if end.timed_out {
            return Ok(result.with_note(timeout_note(self.toolchain)));
        }
        Ok(result)
    }
}

pub(crate) fn timeout_note(toolchain: &Toolchain) -> String {
    match toolchain.timeout {
        Some(limit) => format!("killed after {:.1}s without exiting", limit.as_secs_f64()),
        None => "killed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_appends_flag_source_and_artifact() {
        let toolchain = Toolchain::default();
        let line = toolchain.invoker().command(Stage::Sem, Path::new("tests/lvalue-violate.c"));
        assert_eq!(
            line.to_string(),
            "java -cp bin Main -sem tests/lvalue-violate.c dummy.out"
        );
    }
}
