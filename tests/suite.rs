//! Whole-suite runs: ordering, aggregation and the verdict.
#![cfg(unix)]

mod common;

use automark::stage::PARSER_FAIL;
use automark::{CaseReport, Stage, Suite, TestCase, Verdict};
use common::{Fixture, FIBONACCI, FIBONACCI_PROGRAM};

#[test]
fn every_case_runs_and_reports_in_order() {
    let fx = Fixture::new();
    let fib = fx.source("fibonacci.c", &[FIBONACCI_PROGRAM]);
    let wrong = fx.source("while-loop-wrong.c", &[]);
    let structs = fx.source("structs.c", &["program=exit 0"]);
    let suite = Suite::new(vec![
        TestCase::pipeline(&fib, 0).with_transcript(["12"], FIBONACCI),
        TestCase::new(&wrong, [PARSER_FAIL], [Stage::Parser]).unwrap(),
        TestCase::pipeline(&structs, 0),
    ]);

    let mut seen: Vec<CaseReport> = Vec::new();
    let report = suite.run(&fx.toolchain(), &mut seen).unwrap();

    assert_eq!(seen, report.cases);
    let sources: Vec<&str> = seen.iter().map(|c| c.source.as_str()).collect();
    assert!(sources[0].ends_with("fibonacci.c"));
    assert!(sources[1].ends_with("while-loop-wrong.c"));
    assert!(sources[2].ends_with("structs.c"));

    // The parser accepts the malformed file, which is the only mismatch.
    assert_eq!(report.total(), 6 + 1 + 6);
    assert_eq!(report.passed(), report.total() - 1);
    assert_eq!(report.verdict(), Verdict::Fail);
    assert_eq!(report.summary(), "TOTAL: 12/13");
}

#[test]
fn clean_suite_passes() {
    let fx = Fixture::new();
    let bad = fx.source("reserved-keywords.c", &["parser=245"]);
    let suite = Suite::new(vec![TestCase::new(&bad, [PARSER_FAIL], [Stage::Parser]).unwrap()]);

    let mut seen: Vec<CaseReport> = Vec::new();
    let report = suite.run(&fx.toolchain(), &mut seen).unwrap();

    assert_eq!(report.summary(), "TOTAL: 1/1");
    assert_eq!(report.verdict(), Verdict::Pass);
}

#[test]
fn suite_continues_past_a_dying_program() {
    let fx = Fixture::new();
    let dying = fx.source("fibonacci.c", &["program=printf 'First'; kill -9 $$"]);
    let fine = fx.source("recur.c", &["program=echo 12"]);
    let suite = Suite::new(vec![
        TestCase::new(&dying, 0, [Stage::Gen]).unwrap().with_transcript(["12"], FIBONACCI),
        TestCase::new(&fine, 0, [Stage::Gen]).unwrap().with_transcript(["12"], "12\n"),
    ]);

    let mut seen: Vec<CaseReport> = Vec::new();
    let report = suite.run(&fx.toolchain(), &mut seen).unwrap();

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].fail_count(), 1);
    assert_eq!(seen[1].succ_count(), 2);
    assert_eq!(report.summary(), "TOTAL: 3/4");
    assert_eq!(report.verdict(), Verdict::Fail);
}
