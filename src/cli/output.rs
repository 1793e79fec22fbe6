//! Handles all user-facing output for the CLI.
//!
//! Per-stage lines are printed as each test case finishes, followed by the
//! `TOTAL` line. Transcript mismatches are shown as a line diff.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::case::CaseReport;
use crate::result::StageResult;
use crate::suite::{ReportSink, SuiteReport, Verdict};

/// Picks a colour mode: never when asked, otherwise only on a terminal.
pub fn color_choice(no_color: bool) -> ColorChoice {
    if no_color || !atty::is(atty::Stream::Stdout) {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Writes results to stdout.
pub struct Console {
    stdout: StandardStream,
}

impl Console {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    /// Prints `TOTAL: <passed>/<total>`, green when everything matched.
    pub fn summary(&mut self, report: &SuiteReport) {
        let color = match report.verdict() {
            Verdict::Pass => Color::Green,
            Verdict::Fail => Color::Red,
        };
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = writeln!(self.stdout, "{}", report.summary());
        let _ = self.stdout.reset();
    }

    fn result(&mut self, result: &StageResult) {
        let color = if result.passed { Color::Green } else { Color::Red };
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stdout, "{}", result.status());
        let _ = self.stdout.reset();
        let _ = writeln!(self.stdout, ", {}", result.details());

        if let Some(note) = &result.note {
            let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
            let _ = writeln!(self.stdout, "    {note}");
            let _ = self.stdout.reset();
        }
        if let Some(mismatch) = &result.transcript {
            let changeset = Changeset::new(&mismatch.expected, &mismatch.actual, "\n");
            self.diff(&changeset.diffs);
        }
    }

    fn diff(&mut self, diffs: &[Difference]) {
        for diff in diffs {
            match diff {
                Difference::Same(x) => {
                    let _ = self.stdout.reset();
                    let _ = writeln!(self.stdout, "     {}", x);
                }
                Difference::Add(x) => {
                    let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                    let _ = writeln!(self.stdout, "    +{}", x);
                }
                Difference::Rem(x) => {
                    let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                    let _ = writeln!(self.stdout, "    -{}", x);
                }
            }
        }
        let _ = self.stdout.reset();
    }
}

impl ReportSink for Console {
    fn case_finished(&mut self, report: &CaseReport) {
        for result in &report.results {
            self.result(result);
        }
    }
}
