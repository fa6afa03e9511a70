//! Error types for the cleaning stages.

use thiserror::Error;

use crate::report::Stage;

/// Fatal stage failures. Per-value coercion problems are not errors; they
/// are reported as diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A requested subset column does not exist in the table.
    #[error("column '{column}' not found (requested by {stage})")]
    ColumnNotFound { column: String, stage: Stage },

    /// The constant strategy was requested without a fill value.
    #[error("fill value must be provided for the constant strategy")]
    MissingFillValue,

    /// Strategy text outside the supported set.
    #[error("unknown strategy: '{strategy}' (expected drop, mean, median, mode or constant)")]
    UnknownStrategy { strategy: String },
}

/// Result type for stage operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::ColumnNotFound {
            column: "age".to_string(),
            stage: Stage::Dedup,
        };
        assert_eq!(err.to_string(), "column 'age' not found (requested by dedup)");

        let err = TransformError::UnknownStrategy {
            strategy: "bogus".to_string(),
        };
        assert!(err.to_string().contains("'bogus'"));
    }
}
