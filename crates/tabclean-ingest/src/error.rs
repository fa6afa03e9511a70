//! Error types for table ingestion.

use std::path::PathBuf;
use thiserror::Error;

use tabclean_model::ModelError;

/// Errors that can occur while detecting the delimiter or loading a table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input path does not resolve to a file.
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Content is not valid UTF-8.
    #[error("{path} is not valid UTF-8 text (line {line})")]
    Decode { path: PathBuf, line: u64 },

    /// The csv reader rejected the content.
    #[error("failed to parse {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File has no header row.
    #[error("input file is empty: {path}")]
    EmptyInput { path: PathBuf },

    /// A data row has more fields than the header.
    #[error("{path}: line {line} has {found} fields, expected {expected}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Header names a column twice.
    #[error("{path}: duplicate column name '{column}'")]
    DuplicateColumn { path: PathBuf, column: String },

    /// Assembled columns violate the table invariants.
    #[error("{path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl IngestError {
    /// Whether this error means the input path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InputNotFound { .. })
    }

    pub(crate) fn from_csv(path: &std::path::Path, error: csv::Error) -> Self {
        let path = path.to_path_buf();
        let utf8_line = match error.kind() {
            csv::ErrorKind::Utf8 { pos, .. } => Some(pos.as_ref().map_or(0, csv::Position::line)),
            _ => None,
        };
        match utf8_line {
            Some(line) => Self::Decode { path, line },
            None => Self::CsvParse {
                path,
                source: error,
            },
        }
    }

    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
