use thiserror::Error;

/// Structural violations when assembling a [`crate::Table`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Two columns share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// A column's length differs from the table's row count.
    #[error("column '{name}' has {found} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
