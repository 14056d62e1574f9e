//! Errors at the process boundary: reading input, loading config, writing
//! artifacts. Problems with the paper itself are never errors here; they are
//! carried inside the report.

use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::ConfigError;
use crate::report::ArtifactError;

#[derive(Debug, Error)]
pub enum PaperlintError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
