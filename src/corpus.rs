//! The built-in conformance corpus.
//!
//! Each case targets one behaviour of the compiler: clean compilation of a feature, a specific
//! diagnostic code for malformed input, or the observable behaviour of generated code.

use crate::case::TestCase;
use crate::errors::HarnessError;
use crate::stage::{Stage, PARSER_FAIL, PASS, SEM_FAIL};
use crate::suite::Suite;

const FIBONACCI: &str = "First 12 terms of Fibonacci series are : 0 1 1 2 3 5 8 13 21 34 55 89 \n";

/// Moves of a game where player 1 wins on the diagonal, then declines a rematch.
const TICTACTOE_MOVES: [&str; 11] = ["a", "1", "b", "1", "b", "2", "c", "2", "c", "3", "n"];

const TICTACTOE: &[&str] = &[
    "\n",
    "     1   2   3\n",
    "   +---+---+---+\n",
    "a  |   |   |   |\n",
    "   +---+---+---+\n",
    "b  |   |   |   |\n",
    "   +---+---+---+\n",
    "c  |   |   |   |\n",
    "   +---+---+---+\n",
    "\n",
    "Player 1 select move (e.g. a2)>\n",
    "     1   2   3\n",
    "   +---+---+---+\n",
    "a  | X |   |   |\n",
    "   +---+---+---+\n",
    "b  |   |   |   |\n",
    "   +---+---+---+\n",
    "c  |   |   |   |\n",
    "   +---+---+---+\n",
    "\n",
    "Player 2 select move (e.g. a2)>\n",
    "     1   2   3\n",
    "   +---+---+---+\n",
    "a  | X |   |   |\n",
    "   +---+---+---+\n",
    "b  | O |   |   |\n",
    "   +---+---+---+\n",
    "c  |   |   |   |\n",
    "   +---+---+---+\n",
    "\n",
    "Player 1 select move (e.g. a2)>\n",
    "     1   2   3\n",
    "   +---+---+---+\n",
    "a  | X |   |   |\n",
    "   +---+---+---+\n",
    "b  | O | X |   |\n",
    "   +---+---+---+\n",
    "c  |   |   |   |\n",
    "   +---+---+---+\n",
    "\n",
    "Player 2 select move (e.g. a2)>\n",
    "     1   2   3\n",
    "   +---+---+---+\n",
    "a  | X |   |   |\n",
    "   +---+---+---+\n",
    "b  | O | X |   |\n",
    "   +---+---+---+\n",
    "c  |   | O |   |\n",
    "   +---+---+---+\n",
    "\n",
    "Player 1 select move (e.g. a2)>\n",
    "     1   2   3\n",
    "   +---+---+---+\n",
    "a  | X |   |   |\n",
    "   +---+---+---+\n",
    "b  | O | X |   |\n",
    "   +---+---+---+\n",
    "c  |   | O | X |\n",
    "   +---+---+---+\n",
    "\n",
    "Player 1 has won!\n",
    "Play again? (y/n)> \n",
];

/// The reference suite, in the order it runs.
pub fn builtin() -> Result<Suite, HarnessError> {
    let gen_only = [Stage::Gen];
    Ok(Suite::new(vec![
        TestCase::pipeline("tests/fibonacci.c", PASS).with_transcript(["12"], FIBONACCI),
        TestCase::new("tests/comments.c", [PASS, PASS, PASS, SEM_FAIL, SEM_FAIL], Stage::ALL)?,
        TestCase::pipeline("tests/tictactoe.c", PASS).with_transcript(TICTACTOE_MOVES, TICTACTOE.concat()),
        TestCase::pipeline("tests/structs.c", PASS),
        TestCase::pipeline("tests/char.c", PASS),
        TestCase::new("tests/while-loop-wrong.c", [PARSER_FAIL], [Stage::Parser])?,
        TestCase::new("tests/reserved-keywords.c", [PARSER_FAIL], [Stage::Parser])?,
        TestCase::pipeline("tests/returning_multiple_times.c", PASS),
        TestCase::pipeline("tests/all-syntax.c", PASS),
        TestCase::new("tests/same-fields-struct.c", [SEM_FAIL], [Stage::Sem])?,
        TestCase::new("tests/lvalue-violate.c", [SEM_FAIL], [Stage::Sem])?,
        TestCase::new("tests/arith-mismatch0.c", [SEM_FAIL], [Stage::Sem])?,
        TestCase::new("tests/arith-mismatch1.c", [SEM_FAIL], [Stage::Sem])?,
        TestCase::pipeline("tests/returns.c", PASS),
        TestCase::pipeline("tests/unary-ops.c", PASS),
        TestCase::new("tests/binary_search.c", PASS, gen_only)?
            .with_transcript(Vec::<String>::new(), "12345-19999\n"),
        TestCase::new("tests/recur.c", PASS, gen_only)?.with_transcript(Vec::<String>::new(), "12\n"),
        TestCase::new("tests/array_complex_reduction_8.c", PASS, gen_only)?
            .with_transcript(Vec::<String>::new(), "119462\n"),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::Verifier;

    #[test]
    fn builtin_corpus_is_complete() {
        let suite = builtin().unwrap();
        assert_eq!(suite.len(), 18);
        assert!(suite.cases()[0].source().ends_with("fibonacci.c"));
        assert!(suite.cases()[17].source().ends_with("array_complex_reduction_8.c"));
    }

    #[test]
    fn syntax_error_cases_run_only_the_parser() {
        let suite = builtin().unwrap();
        let case = &suite.cases()[5];
        assert_eq!(case.stages(), [Stage::Parser]);
        assert_eq!(case.expected(), [245]);
    }

    #[test]
    fn tictactoe_transcript_shows_every_board() {
        let suite = builtin().unwrap();
        let Verifier::ExactTranscript { input, expected } = suite.cases()[2].verifier() else {
            panic!("tictactoe should be judged by its transcript");
        };
        assert_eq!(input.len(), 11);
        let text = String::from_utf8(expected).unwrap();
        assert_eq!(text.matches("     1   2   3").count(), 6);
        assert!(text.ends_with("Player 1 has won!\nPlay again? (y/n)> \n"));
    }
}
