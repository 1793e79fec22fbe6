//! Automark: a conformance harness for a staged compiler and the simulator that runs its output.
//!
//! A [`TestCase`] names a source program, the compiler stages to run it through and the exit code
//! each stage should produce. When code generation succeeds, the generated program is run under
//! the simulator and judged by a [`Verifier`]. A [`Suite`] runs its cases in order and reduces
//! every recorded [`StageResult`] to a single pass/fail [`Verdict`].

pub use crate::case::{CaseReport, Expected, TestCase};
pub use crate::errors::HarnessError;
pub use crate::harness::RunConfig;
pub use crate::process::CommandLine;
pub use crate::result::StageResult;
pub use crate::stage::{Stage, Step};
pub use crate::suite::{ReportSink, Suite, SuiteReport, Verdict};
pub use crate::toolchain::Toolchain;
pub use crate::verifier::Verifier;

pub mod case;
pub mod cli;
pub mod corpus;
pub mod errors;
pub mod harness;
pub mod invoker;
pub mod manifest;
pub mod process;
pub mod result;
pub mod stage;
pub mod suite;
pub mod toolchain;
pub mod verifier;
