use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tabclean_model::Table;
use tracing::{debug, info};

use crate::error::Result;
use crate::key::CellKey;
use crate::report::{Reporter, Stage, StageSummary};
use crate::select::resolve_columns;

/// How missing cells compare when looking for duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullEquality {
    /// Two missing cells are equal (dataframe `drop_duplicates` semantics).
    #[default]
    Equal,
    /// A row with a missing comparison cell is never a duplicate.
    Distinct,
}

/// Removes rows that repeat an earlier row on the comparison columns.
///
/// The first occurrence is kept and survivors keep their order. `None` or
/// an empty subset compares every column.
///
/// # Errors
///
/// Returns [`crate::TransformError::ColumnNotFound`] if a subset column is
/// absent; the table is not modified in that case.
pub fn remove_duplicates(
    table: Table,
    subset: Option<&[String]>,
    nulls: NullEquality,
    reporter: &mut Reporter,
) -> Result<Table> {
    let key_columns = resolve_columns(&table, subset, Stage::Dedup)?;
    debug!(
        columns = key_columns.len(),
        nulls = ?nulls,
        "comparing rows for duplicates"
    );

    let keep = duplicate_mask(&table, &key_columns, nulls);
    let rows_before = table.row_count();
    let columns = table.column_count();
    let deduped = table.filter_rows(&keep);

    let summary = StageSummary {
        stage: Stage::Dedup,
        detail: subset
            .filter(|names| !names.is_empty())
            .map(|names| names.join(", ")),
        rows_before,
        rows_after: deduped.row_count(),
        columns_before: columns,
        columns_after: columns,
        affected_columns: Vec::new(),
        cells_filled: 0,
    };
    info!(
        removed = summary.rows_removed(),
        remaining = summary.rows_after,
        "removed duplicate rows"
    );
    reporter.record_stage(summary);
    Ok(deduped)
}

fn duplicate_mask(table: &Table, key_columns: &[usize], nulls: NullEquality) -> Vec<bool> {
    let columns = table.columns();
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
    (0..table.row_count())
        .map(|row| {
            let key: Vec<CellKey<'_>> = key_columns
                .iter()
                .filter_map(|&idx| columns.get(idx)?.values().get(row))
                .map(CellKey::of)
                .collect();
            if nulls == NullEquality::Distinct && key.iter().any(|cell| cell.is_missing()) {
                return true;
            }
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use tabclean_model::{Column, ColumnType, Value};

    fn table() -> Table {
        Table::new(vec![
            Column::new(
                "id",
                ColumnType::Integer,
                vec![
                    Value::Int(1),
                    Value::Int(1),
                    Value::Int(2),
                    Value::Missing,
                    Value::Missing,
                ],
            ),
            Column::new(
                "tag",
                ColumnType::Text,
                vec![
                    Value::from("a"),
                    Value::from("a"),
                    Value::from("a"),
                    Value::from("b"),
                    Value::from("b"),
                ],
            ),
        ])
        .expect("table")
    }

    #[test]
    fn keeps_first_occurrence_across_all_columns() {
        let mut reporter = Reporter::new();
        let out = remove_duplicates(table(), None, NullEquality::Equal, &mut reporter)
            .expect("dedup");
        assert_eq!(out.row_count(), 3);
        assert_eq!(
            out.column("id").expect("id").values(),
            &[Value::Int(1), Value::Int(2), Value::Missing]
        );
        assert_eq!(reporter.stages()[0].rows_removed(), 2);
    }

    #[test]
    fn subset_limits_comparison() {
        let mut reporter = Reporter::new();
        let subset = vec!["tag".to_string()];
        let out = remove_duplicates(table(), Some(&subset), NullEquality::Equal, &mut reporter)
            .expect("dedup");
        assert_eq!(out.row_count(), 2);
        assert_eq!(reporter.stages()[0].detail.as_deref(), Some("tag"));
    }

    #[test]
    fn distinct_nulls_keep_rows_with_missing_keys() {
        let mut reporter = Reporter::new();
        let out = remove_duplicates(table(), None, NullEquality::Distinct, &mut reporter)
            .expect("dedup");
        assert_eq!(out.row_count(), 4);
    }

    #[test]
    fn unknown_subset_column_fails() {
        let mut reporter = Reporter::new();
        let subset = vec!["nonexistent".to_string()];
        let err = remove_duplicates(table(), Some(&subset), NullEquality::Equal, &mut reporter)
            .expect_err("missing column");
        assert_eq!(
            err,
            TransformError::ColumnNotFound {
                column: "nonexistent".to_string(),
                stage: Stage::Dedup,
            }
        );
        assert!(reporter.stages().is_empty());
    }
}
