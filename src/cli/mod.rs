//! The Automark Command-Line Interface.
//!
//! Turns arguments into a [`RunConfig`], runs it, and maps the outcome onto
//! the process exit status: 0 when everything matched, 1 on any mismatch,
//! 2 when the harness itself could not do its job.

use std::process::ExitCode;

use clap::Parser;

use crate::cli::args::AutomarkArgs;
use crate::cli::output::{color_choice, Console};
use crate::corpus;
use crate::errors::HarnessError;
use crate::harness::{self, RunConfig};
use crate::manifest::{timeout_from_secs, Manifest};
use crate::suite::EXIT_FATAL;
use crate::toolchain::Toolchain;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = AutomarkArgs::parse();
    let mut console = Console::new(color_choice(args.no_color));

    let result = configure(args).and_then(|config| harness::execute(config, &mut console));
    match result {
        Ok(report) => {
            console.summary(&report);
            report.verdict().into()
        }
        Err(e) => {
            print_error(e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Defaults, then the manifest, then command-line flags.
pub fn configure(args: AutomarkArgs) -> Result<RunConfig, HarnessError> {
    let mut toolchain = Toolchain::default();
    let mut build = Some(harness::default_build());

    let suite = match &args.suite {
        Some(path) => {
            let manifest = Manifest::load(path)?;
            manifest.apply(&mut toolchain);
            if let Some(line) = manifest.build() {
                build = Some(line.clone());
            }
            manifest.suite()?
        }
        None => corpus::builtin()?,
    };

    if args.not_compile {
        build = None;
    }
    if let Some(secs) = args.timeout {
        toolchain.timeout = timeout_from_secs(secs);
    }
    toolchain.verbose = args.verbose;

    let suite = match &args.filter {
        Some(pattern) => suite.filtered(pattern),
        None => suite,
    };

    Ok(RunConfig {
        toolchain,
        build,
        suite,
        report: args.report,
    })
}

pub fn print_error(error: HarnessError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_corpus_with_build_by_default() {
        let config = configure(AutomarkArgs::parse_from(["automark"])).unwrap();
        assert_eq!(config.suite.len(), 18);
        assert_eq!(config.build, Some(harness::default_build()));
        assert!(!config.toolchain.verbose);
    }

    #[test]
    fn flags_override_defaults() {
        let args = AutomarkArgs::parse_from([
            "automark",
            "--not-compile",
            "--timeout",
            "0",
            "--filter",
            "arith",
            "-v",
        ]);
        let config = configure(args).unwrap();
        assert!(config.build.is_none());
        assert_eq!(config.toolchain.timeout, None);
        assert!(config.toolchain.verbose);
        assert_eq!(config.suite.len(), 2);
    }

    #[test]
    fn missing_manifest_is_a_read_error() {
        let args = AutomarkArgs::parse_from(["automark", "--suite", "no/such/suite.yaml"]);
        assert!(matches!(configure(args), Err(HarnessError::Read { .. })));
    }
}
