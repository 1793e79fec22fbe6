//! Defines the command-line arguments for the Automark CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "automark",
    version,
    about = "Drive a staged compiler through its conformance corpus and check the simulator transcripts."
)]
pub struct AutomarkArgs {
    /// Skip the build step and test the binaries already on disk.
    #[arg(long)]
    pub not_compile: bool,

    /// Load test cases and toolchain settings from a YAML manifest instead of the built-in corpus.
    #[arg(long, value_name = "FILE")]
    pub suite: Option<PathBuf>,

    /// Kill any subprocess still running after this many seconds; 0 waits forever.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Run only the cases whose source path contains this substring.
    #[arg(short, long, value_name = "SUBSTR")]
    pub filter: Option<String>,

    /// Write every recorded result to this file as JSON.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Echo each command to stderr before running it.
    #[arg(short, long)]
    pub verbose: bool,

    /// Never colour the output.
    #[arg(long)]
    pub no_color: bool,
}
