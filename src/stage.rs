//! Pipeline stages of the compiler under test and the exit codes it reports.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Exit code of a stage that finished cleanly, or of a program that ran to completion.
pub const PASS: i32 = 0;
/// The source file given to the compiler does not exist.
pub const FILE_NOT_FOUND: i32 = 2;
/// The compiler rejected its command-line mode flag.
pub const MODE_FAIL: i32 = 254;
/// Lexical error in the source program.
pub const LEXER_FAIL: i32 = 250;
/// Syntax error in the source program.
pub const PARSER_FAIL: i32 = 245;
/// Semantic analysis error in the source program.
pub const SEM_FAIL: i32 = 240;

/// One phase of the compiler pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[serde(alias = "lex")]
    Lexer,
    #[serde(alias = "parse")]
    Parser,
    Ast,
    Sem,
    Gen,
}

impl Stage {
    /// Every stage in pipeline order.
    pub const ALL: [Stage; 5] = [Stage::Lexer, Stage::Parser, Stage::Ast, Stage::Sem, Stage::Gen];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Lexer => "lexer",
            Stage::Parser => "parser",
            Stage::Ast => "ast",
            Stage::Sem => "sem",
            Stage::Gen => "gen",
        }
    }

    /// The mode flag the compiler expects, e.g. `-parser`.
    pub fn flag(&self) -> String {
        format!("-{}", self.as_str())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a [`crate::StageResult`] records: a compiler stage, or running the generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage(Stage),
    Execute,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Stage(stage) => stage.fmt(f),
            Step::Execute => f.write_str("execute"),
        }
    }
}

/// Serialized by name, e.g. `"sem"` or `"execute"`.
impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_match_compiler_modes() {
        let flags: Vec<String> = Stage::ALL.iter().map(Stage::flag).collect();
        assert_eq!(flags, ["-lexer", "-parser", "-ast", "-sem", "-gen"]);
    }

    #[test]
    fn short_aliases_deserialize() {
        let stages: Vec<Stage> = serde_yaml::from_str("[lex, parse, ast, sem, gen]").unwrap();
        assert_eq!(stages, Stage::ALL);
        let stages: Vec<Stage> = serde_yaml::from_str("[lexer, parser]").unwrap();
        assert_eq!(stages, [Stage::Lexer, Stage::Parser]);
    }

    #[test]
    fn failure_codes_are_distinct() {
        let codes = [PASS, FILE_NOT_FOUND, MODE_FAIL, LEXER_FAIL, PARSER_FAIL, SEM_FAIL];
        for (i, a) in codes.iter().enumerate() {
            assert!(codes[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn steps_serialize_by_name() {
        assert_eq!(serde_json::to_string(&Step::Stage(Stage::Sem)).unwrap(), "\"sem\"");
        assert_eq!(serde_json::to_string(&Step::Execute).unwrap(), "\"execute\"");
    }
}
