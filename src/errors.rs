//! Automark error handling.
//!
//! Only conditions that make the run itself meaningless live here: a malformed test case, a
//! manifest that cannot be loaded, a toolchain that cannot be started. Everything the subject
//! under test does wrong is recorded as data in a [`crate::StageResult`] instead.

use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Fatal harness failures. Any of these aborts the run with exit status 2.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("test case `{source_path}` declares {stages} stage(s) but {expected} expected exit code(s)")]
    #[diagnostic(
        code(automark::config::expectation_length),
        help("give a single exit code, or exactly one exit code per stage")
    )]
    ExpectationLength {
        source_path: String,
        stages: usize,
        expected: usize,
    },

    #[error("test case `{source_path}` declares no stages")]
    #[diagnostic(code(automark::config::no_stages))]
    NoStages { source_path: String },

    #[error("the {role} command line is empty")]
    #[diagnostic(
        code(automark::config::empty_command),
        help("a command line needs at least a program name")
    )]
    EmptyCommand { role: &'static str },

    #[error("failed to launch `{command}`")]
    #[diagnostic(
        code(automark::launch),
        help("the harness environment is broken, not the program under test; check the toolchain is built and reachable")
    )]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("lost track of `{command}` while waiting for it to exit")]
    #[diagnostic(code(automark::wait))]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("build step `{command}` failed ({status})")]
    #[diagnostic(
        code(automark::build),
        help("fix the build, or pass --not-compile to run against the existing binaries")
    )]
    Build { command: String, status: String },

    #[error("cannot read `{}`", .path.display())]
    #[diagnostic(code(automark::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write report to `{}`", .path.display())]
    #[diagnostic(code(automark::io::report))]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid suite manifest: {message}")]
    #[diagnostic(code(automark::manifest))]
    Manifest {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },
}

impl HarnessError {
    /// Builds a manifest error pointing at the location serde_yaml reported, if any.
    pub fn manifest(name: &str, content: &str, error: &serde_yaml::Error) -> Self {
        let span = error
            .location()
            .map(|loc| SourceSpan::from((loc.index().min(content.len()), 1)));
        HarnessError::Manifest {
            message: error.to_string(),
            src: NamedSource::new(name, content.to_string()),
            span,
        }
    }
}
