//! Runs a fixed list of test cases and turns their results into a single verdict.

use std::process::ExitCode;

use serde::Serialize;

use crate::case::{CaseReport, TestCase};
use crate::errors::HarnessError;
use crate::toolchain::Toolchain;

/// Exit status of a run where every expectation matched.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of a run with at least one mismatch.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status of a run that could not be carried out at all.
pub const EXIT_FATAL: u8 = 2;

/// Receives each case report as soon as its case has finished.
pub trait ReportSink {
    fn case_finished(&mut self, report: &CaseReport);
}

/// Collects reports in memory, for tests and programmatic use.
impl ReportSink for Vec<CaseReport> {
    fn case_finished(&mut self, report: &CaseReport) {
        self.push(report.clone());
    }
}

/// The ordered conformance corpus.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Keeps only the cases whose source path contains `pattern`.
    pub fn filtered(self, pattern: &str) -> Self {
        let cases = self
            .cases
            .into_iter()
            .filter(|case| case.source().to_string_lossy().contains(pattern))
            .collect();
        Self { cases }
    }

    /// Runs every case in order, one at a time, reporting each as it completes.
    ///
    /// Mismatches never stop the suite; only a fatal harness error does.
    pub fn run(self, toolchain: &Toolchain, sink: &mut dyn ReportSink) -> Result<SuiteReport, HarnessError> {
        let mut cases = Vec::with_capacity(self.cases.len());
        for case in self.cases {
            let report = case.run(toolchain)?;
            sink.case_finished(&report);
            cases.push(report);
        }
        Ok(SuiteReport { cases })
    }
}

/// Overall outcome of a suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn code(self) -> u8 {
        match self {
            Verdict::Pass => EXIT_SUCCESS,
            Verdict::Fail => EXIT_FAILURE,
        }
    }
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        ExitCode::from(verdict.code())
    }
}

/// All case reports of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().map(CaseReport::succ_count).sum()
    }

    pub fn total(&self) -> usize {
        self.cases.iter().map(CaseReport::count).sum()
    }

    pub fn verdict(&self) -> Verdict {
        if self.passed() == self.total() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// `"TOTAL: <passed>/<total>"`
    pub fn summary(&self) -> String {
        format!("TOTAL: {}/{}", self.passed(), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::StageResult;
    use crate::stage::{Stage, Step};

    fn report(source: &str, outcomes: &[bool]) -> CaseReport {
        CaseReport {
            source: source.to_string(),
            results: outcomes
                .iter()
                .map(|&ok| {
                    StageResult::compared(Step::Stage(Stage::Gen), source, Some(0), if ok { 0 } else { 1 }, "c")
                })
                .collect(),
        }
    }

    #[test]
    fn all_matching_results_pass() {
        let suite = SuiteReport {
            cases: vec![report("a.c", &[true, true]), report("b.c", &[true])],
        };
        assert_eq!(suite.summary(), "TOTAL: 3/3");
        assert_eq!(suite.verdict(), Verdict::Pass);
        assert_eq!(suite.verdict().code(), EXIT_SUCCESS);
    }

    #[test]
    fn one_mismatch_anywhere_fails() {
        let suite = SuiteReport {
            cases: vec![report("a.c", &[true, true]), report("b.c", &[true, false])],
        };
        assert_eq!(suite.summary(), "TOTAL: 3/4");
        assert_eq!(suite.verdict(), Verdict::Fail);
        assert_eq!(suite.verdict().code(), EXIT_FAILURE);
    }

    #[test]
    fn filter_keeps_matching_sources_in_order() {
        let suite = Suite::new(vec![
            TestCase::pipeline("tests/arith-mismatch0.c", 240),
            TestCase::pipeline("tests/structs.c", 0),
            TestCase::pipeline("tests/arith-mismatch1.c", 240),
        ])
        .filtered("arith");
        let sources: Vec<_> = suite.cases().iter().map(|c| c.source().to_path_buf()).collect();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].ends_with("arith-mismatch0.c"));
        assert!(sources[1].ends_with("arith-mismatch1.c"));
    }

    #[test]
    fn empty_suite_passes_vacuously() {
        let mut sink: Vec<CaseReport> = Vec::new();
        let report = Suite::default().run(&Toolchain::default(), &mut sink).unwrap();
        assert_eq!(report.summary(), "TOTAL: 0/0");
        assert_eq!(report.verdict(), Verdict::Pass);
        assert!(sink.is_empty());
    }
}
