use tabclean_model::Table;

use crate::error::{Result, TransformError};
use crate::report::Stage;

/// Column indices for a subset; `None` or an empty subset selects every column.
pub(crate) fn resolve_columns(
    table: &Table,
    subset: Option<&[String]>,
    stage: Stage,
) -> Result<Vec<usize>> {
    match subset {
        Some(names) if !names.is_empty() => names
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| TransformError::ColumnNotFound {
                        column: name.clone(),
                        stage,
                    })
            })
            .collect(),
        _ => Ok((0..table.column_count()).collect()),
    }
}
