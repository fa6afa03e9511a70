use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing a table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The destination directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or finalizing the destination file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
