//! Validation issues shared by the parser diagnostics and the rule engine.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable identifier of the rule or parser check that raised an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // Parser diagnostics
    LexicalError,
    SyntaxError,
    DuplicateHeader,
    MissingHeader,
    MalformedNumber,
    UnrecognizedLine,
    UnknownKind,
    UnknownDifficulty,
    IgnoredOptions,
    SubQuestionNumbering,

    // Semantic rules
    MarksMismatch,
    UncoveredTopic,
    DifficultyImbalance,
    TimeBudget,
    ComparisonLimit,
    McqNoAnswer,
    McqMultipleAnswers,
    McqAnswerNotInOptions,
    McqDuplicateOption,
    DuplicateQuestion,
    UnknownTopic,
}

impl IssueCode {
    /// Ordering of rules within one scope of the report.
    pub fn priority(self) -> u8 {
        match self {
            Self::LexicalError | Self::SyntaxError => 0,
            Self::DuplicateHeader
            | Self::MissingHeader
            | Self::MalformedNumber
            | Self::UnrecognizedLine
            | Self::UnknownKind
            | Self::UnknownDifficulty
            | Self::IgnoredOptions
            | Self::SubQuestionNumbering => 0,
            Self::MarksMismatch => 1,
            Self::UncoveredTopic => 2,
            Self::DifficultyImbalance => 3,
            Self::TimeBudget => 4,
            Self::ComparisonLimit => 5,
            Self::McqNoAnswer
            | Self::McqMultipleAnswers
            | Self::McqAnswerNotInOptions
            | Self::McqDuplicateOption => 6,
            Self::DuplicateQuestion => 7,
            Self::UnknownTopic => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LexicalError => "lexical_error",
            Self::SyntaxError => "syntax_error",
            Self::DuplicateHeader => "duplicate_header",
            Self::MissingHeader => "missing_header",
            Self::MalformedNumber => "malformed_number",
            Self::UnrecognizedLine => "unrecognized_line",
            Self::UnknownKind => "unknown_kind",
            Self::UnknownDifficulty => "unknown_difficulty",
            Self::IgnoredOptions => "ignored_options",
            Self::SubQuestionNumbering => "sub_question_numbering",
            Self::MarksMismatch => "marks_mismatch",
            Self::UncoveredTopic => "uncovered_topic",
            Self::DifficultyImbalance => "difficulty_imbalance",
            Self::TimeBudget => "time_budget",
            Self::ComparisonLimit => "comparison_limit",
            Self::McqNoAnswer => "mcq_no_answer",
            Self::McqMultipleAnswers => "mcq_multiple_answers",
            Self::McqAnswerNotInOptions => "mcq_answer_not_in_options",
            Self::McqDuplicateOption => "mcq_duplicate_option",
            Self::DuplicateQuestion => "duplicate_question",
            Self::UnknownTopic => "unknown_topic",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding about a paper. Issues are data, never failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub question: Option<u32>,
    pub line: Option<usize>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            question: None,
            line: None,
        }
    }

    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            question: None,
            line: None,
        }
    }

    pub fn for_question(mut self, number: u32) -> Self {
        self.question = Some(number);
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{severity}[{}]", self.code)?;
        if let Some(line) = self.line {
            write!(f, " line {line}")?;
        }
        if let Some(q) = self.question {
            write!(f, " Q{q}")?;
        }
        write!(f, ": {}", self.message)
    }
}
