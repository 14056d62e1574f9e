//! Job directory artifacts written after a compilation.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::CompilationReport;
use crate::export::{self, AstGraph};

pub const INPUT_FILE: &str = "input.qp";
pub const TOKENS_FILE: &str = "tokens.json";
pub const AST_FILE: &str = "ast.json";
pub const GRAPH_FILE: &str = "ast_graph.json";
pub const DOT_FILE: &str = "ast.dot";
pub const SEMANTIC_FILE: &str = "semantic_report.json";
pub const REPORT_FILE: &str = "report.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize {name}: {source}")]
    Json {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Paths of the files written for one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobArtifacts {
    pub written: Vec<PathBuf>,
}

impl JobArtifacts {
    pub fn contains(&self, name: &str) -> bool {
        self.written.iter().any(|p| p.file_name().is_some_and(|f| f == name))
    }
}

/// Write every artifact of `report` into `out_dir`, creating it if needed.
/// AST exports are only written when an AST was produced.
pub fn write_job_artifacts(
    out_dir: &Path,
    report: &CompilationReport,
) -> Result<JobArtifacts, ArtifactError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ArtifactError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut artifacts = JobArtifacts::default();
    let mut write = |name: &'static str, content: String| -> Result<(), ArtifactError> {
        let path = out_dir.join(name);
        std::fs::write(&path, content).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote artifact");
        artifacts.written.push(path);
        Ok(())
    };

    write(TOKENS_FILE, json(TOKENS_FILE, &report.tokens)?)?;

    if let Some(paper) = &report.paper {
        let ast = export::to_json(paper).map_err(|source| ArtifactError::Json {
            name: AST_FILE,
            source,
        })?;
        write(AST_FILE, ast)?;

        let graph = AstGraph::from_paper(paper);
        write(GRAPH_FILE, json(GRAPH_FILE, &graph)?)?;
        write(DOT_FILE, graph.to_dot())?;
    }

    write(SEMANTIC_FILE, json(SEMANTIC_FILE, &report.semantic_report())?)?;
    write(REPORT_FILE, json(REPORT_FILE, report)?)?;

    Ok(artifacts)
}

fn json<T: Serialize + ?Sized>(name: &'static str, value: &T) -> Result<String, ArtifactError> {
    serde_json::to_string_pretty(value).map_err(|source| ArtifactError::Json { name, source })
}
