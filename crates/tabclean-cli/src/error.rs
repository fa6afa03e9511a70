//! Stage-tagged pipeline failures and their exit codes.

use std::path::PathBuf;
use thiserror::Error;

use tabclean_ingest::IngestError;
use tabclean_output::OutputError;
use tabclean_transform::TransformError;

/// A fatal pipeline failure, tagged with the stage that raised it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("failed to read input: {0}")]
    Load(#[source] IngestError),

    #[error("deduplication failed: {0}")]
    Dedup(#[source] TransformError),

    #[error("missing-value handling failed: {0}")]
    Missing(#[source] TransformError),

    #[error("failed to write output: {0}")]
    Write(#[source] OutputError),
}

impl PipelineError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } => 2,
            Self::Load(_) => 3,
            Self::Missing(_) => 4,
            Self::Write(_) => 5,
            Self::Dedup(_) => 6,
        }
    }

    /// Short machine-readable failure category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "input_not_found",
            Self::Load(_) => "load",
            Self::Dedup(_) => "dedup",
            Self::Missing(_) => "missing",
            Self::Write(_) => "write",
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::InputNotFound { path } => Self::InputNotFound { path },
            other => Self::Load(other),
        }
    }
}

impl From<OutputError> for PipelineError {
    fn from(error: OutputError) -> Self {
        Self::Write(error)
    }
}
