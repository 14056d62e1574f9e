//! DSL front end: source text → tokens → `Paper` AST.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use error::{CompileError, ErrorKind};
pub use token::{Token, TokenKind, TokenRecord};

use tracing::debug;

use crate::analysis::{self, AnalyzerConfig};
use crate::issue::ValidationIssue;
use crate::report::CompilationReport;
use lexer::Lexer;
use parser::Parser;

/// Result of parsing: the paper, or the fatal error, plus every diagnostic
/// collected on the way.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub tokens: Vec<Token>,
    pub paper: Result<Paper, CompileError>,
    pub diagnostics: Vec<ValidationIssue>,
}

/// The paper compiler.
///
/// Runs lexer → parser → analyzer over one source text. Each call is
/// independent; nothing is shared between compilations.
pub struct Compiler;

impl Compiler {
    /// Lex as far as possible. On a malformed character the tokens before
    /// it are returned together with the error.
    pub fn tokenize(source: &str) -> (Vec<Token>, Option<CompileError>) {
        let mut tokens = Vec::new();
        for item in Lexer::new(source) {
            match item {
                Ok(token) => tokens.push(token),
                Err(err) => return (tokens, Some(err)),
            }
        }
        (tokens, None)
    }

    /// Parse DSL source into a Paper AST.
    pub fn parse(source: &str) -> Result<Paper, CompileError> {
        Self::parse_with_diagnostics(source).paper
    }

    pub fn parse_with_diagnostics(source: &str) -> ParseOutcome {
        let (tokens, lex_error) = Self::tokenize(source);
        debug!(tokens = tokens.len(), "lexed source");

        if let Some(err) = lex_error {
            return ParseOutcome {
                tokens,
                paper: Err(err),
                diagnostics: Vec::new(),
            };
        }

        let mut parser = Parser::new(&tokens);
        let paper = parser.parse();
        let diagnostics = parser.into_diagnostics();
        debug!(
            ok = paper.is_ok(),
            diagnostics = diagnostics.len(),
            "parsed paper"
        );

        ParseOutcome {
            tokens,
            paper,
            diagnostics,
        }
    }

    /// Parse, analyze and assemble the full report. Never fails: fatal
    /// errors are carried inside the report.
    pub fn compile(source: &str, config: &AnalyzerConfig) -> CompilationReport {
        let outcome = Self::parse_with_diagnostics(source);
        let analysis = outcome
            .paper
            .as_ref()
            .ok()
            .map(|paper| analysis::analyze(paper, config));
        CompilationReport::assemble(outcome, analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_returns_prefix_on_error() {
        let (tokens, err) = Compiler::tokenize("Exam: X\nQ1 @@@");
        let err = err.unwrap();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].kind, TokenKind::QuestionMarker(1));
    }

    #[test]
    fn tokenize_ends_with_eof() {
        let (tokens, err) = Compiler::tokenize("Exam: X");
        assert!(err.is_none());
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    #[test]
    fn parse_reports_lex_error() {
        let err = Compiler::parse("Q1 [Short] (2 marks) `x`").unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
    }

    #[test]
    fn parse_keeps_diagnostics_alongside_paper() {
        let outcome = Compiler::parse_with_diagnostics("Q1 [Short] (2 marks)\nX\nCorrect: y\n---\n");
        assert!(outcome.paper.is_ok());
        assert_eq!(outcome.diagnostics.len(), 3);
        assert!(!outcome.tokens.is_empty());
    }
}
