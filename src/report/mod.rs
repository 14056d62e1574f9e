//! Compilation report: everything one run produced, in one value.

pub mod artifacts;

pub use artifacts::{write_job_artifacts, ArtifactError, JobArtifacts};

use serde::Serialize;

use crate::analysis::{Analysis, Statistics};
use crate::dsl::{CompileError, ErrorKind, ParseOutcome, Paper, TokenRecord};
use crate::issue::{IssueCode, ValidationIssue};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationReport {
    pub ast_produced: bool,
    pub paper: Option<Paper>,
    pub tokens: Vec<TokenRecord>,
    pub issues: Vec<ValidationIssue>,
    pub statistics: Option<Statistics>,
    pub fatal: Option<CompileError>,
}

/// The `semantic_report.json` view of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticReport<'a> {
    pub ast_produced: bool,
    pub issues: &'a [ValidationIssue],
    pub statistics: Option<&'a Statistics>,
}

impl CompilationReport {
    /// Merge parser diagnostics, the fatal error (if any) and the analyzer
    /// output, in that order.
    pub fn assemble(outcome: ParseOutcome, analysis: Option<Analysis>) -> Self {
        let tokens = outcome.tokens.iter().map(TokenRecord::from).collect();
        let mut issues = outcome.diagnostics;

        let (paper, fatal) = match outcome.paper {
            Ok(paper) => (Some(paper), None),
            Err(err) => {
                issues.push(fatal_issue(&err));
                (None, Some(err))
            }
        };

        let statistics = match (&paper, analysis) {
            (Some(_), Some(analysis)) => {
                issues.extend(analysis.issues);
                Some(analysis.statistics)
            }
            _ => None,
        };

        Self {
            ast_produced: paper.is_some(),
            paper,
            tokens,
            issues,
            statistics,
            fatal,
        }
    }

    pub fn semantic_report(&self) -> SemanticReport<'_> {
        SemanticReport {
            ast_produced: self.ast_produced,
            issues: &self.issues,
            statistics: self.statistics.as_ref(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

fn fatal_issue(err: &CompileError) -> ValidationIssue {
    let code = match err.kind {
        ErrorKind::LexError => IssueCode::LexicalError,
        ErrorKind::ParseError => IssueCode::SyntaxError,
    };
    ValidationIssue::error(code, err.message.clone()).at_line(err.line)
}
