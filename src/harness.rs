//! Top-level run: optional build step, the suite itself, and the optional JSON report.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::errors::HarnessError;
use crate::process::{self, CommandLine};
use crate::suite::{ReportSink, Suite, SuiteReport};
use crate::toolchain::Toolchain;

/// Everything one harness run needs, decided up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub toolchain: Toolchain,
    /// Runs before any test case; `None` tests whatever binaries are already there.
    pub build: Option<CommandLine>,
    pub suite: Suite,
    pub report: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(toolchain: Toolchain, suite: Suite) -> Self {
        Self {
            toolchain,
            build: None,
            suite,
            report: None,
        }
    }
}

pub fn default_build() -> CommandLine {
    CommandLine::new("ant").arg("build")
}

/// A build step that exits unsuccessfully or cannot start aborts the run.
pub fn build(line: &CommandLine) -> Result<(), HarnessError> {
    let end = process::run_inherited(line)?;
    match end.code {
        Some(0) => Ok(()),
        Some(code) => Err(HarnessError::Build {
            command: line.to_string(),
            status: format!("exit code {code}"),
        }),
        None => Err(HarnessError::Build {
            command: line.to_string(),
            status: "killed by a signal".to_string(),
        }),
    }
}

pub fn execute(config: RunConfig, sink: &mut dyn ReportSink) -> Result<SuiteReport, HarnessError> {
    if let Some(line) = &config.build {
        build(line)?;
    }
    let report = config.suite.run(&config.toolchain, sink)?;
    if let Some(path) = &config.report {
        write_report(path, &report)?;
    }
    Ok(report)
}

fn write_report(path: &Path, report: &SuiteReport) -> Result<(), HarnessError> {
    let to_error = |source| HarnessError::Report {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .map_err(|e| to_error(std::io::Error::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_runs_ant() {
        assert_eq!(default_build().to_string(), "ant build");
    }

    #[cfg(unix)]
    #[test]
    fn failing_build_is_fatal() {
        let line = CommandLine::new("sh").arg("-c").arg("exit 3");
        let err = build(&line).unwrap_err();
        assert!(matches!(err, HarnessError::Build { ref status, .. } if status == "exit code 3"));
    }

    #[test]
    fn report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut config = RunConfig::new(Toolchain::default(), Suite::default());
        config.report = Some(path.clone());
        let mut sink: Vec<crate::CaseReport> = Vec::new();
        execute(config, &mut sink).unwrap();

        let json: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(json["cases"], serde_json::json!([]));
    }
}
