//! paperlint — a compiler front end for exam question papers.
//!
//! Source text written in the question paper DSL is lexed, parsed into a
//! [`dsl::Paper`], checked against academic rules and turned into a
//! [`report::CompilationReport`] plus AST exports.

pub mod analysis;
pub mod dsl;
pub mod error;
pub mod export;
pub mod issue;
pub mod report;

pub use analysis::AnalyzerConfig;
pub use dsl::Compiler;
pub use error::PaperlintError;
pub use report::CompilationReport;
