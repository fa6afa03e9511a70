use std::collections::{BTreeSet, HashSet};

use tabclean_model::{Column, Table};
use tracing::{debug, info};

use crate::key::CellKey;
use crate::report::{Reporter, Stage, StageSummary};

/// Removes every column with at most one distinct non-missing value.
///
/// Fully missing columns and columns of a zero-row table count as constant.
/// Removing every column is allowed; the row count is kept.
pub fn drop_constant_columns(table: Table, reporter: &mut Reporter) -> Table {
    let constant: Vec<String> = table
        .columns()
        .iter()
        .filter(|column| is_constant(column))
        .map(|column| column.name().to_string())
        .collect();
    for name in &constant {
        debug!(column = %name, "dropping constant column");
    }

    let rows = table.row_count();
    let columns_before = table.column_count();
    let names: BTreeSet<String> = constant.iter().cloned().collect();
    let pruned = table.drop_columns(&names);

    let summary = StageSummary {
        stage: Stage::DropConstant,
        detail: None,
        rows_before: rows,
        rows_after: rows,
        columns_before,
        columns_after: pruned.column_count(),
        affected_columns: constant,
        cells_filled: 0,
    };
    info!(
        removed = summary.columns_removed(),
        remaining = summary.columns_after,
        "dropped constant columns"
    );
    reporter.record_stage(summary);
    pruned
}

/// Whether the column has at most one distinct non-missing value.
pub fn is_constant(column: &Column) -> bool {
    let mut distinct = HashSet::new();
    for value in column.values() {
        let key = CellKey::of(value);
        if key.is_missing() {
            continue;
        }
        distinct.insert(key);
        if distinct.len() > 1 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabclean_model::{ColumnType, Value};

    #[test]
    fn constant_detection() {
        let single = Column::new(
            "a",
            ColumnType::Text,
            vec![Value::from("x"), Value::Missing, Value::from("x")],
        );
        let missing = Column::new("b", ColumnType::Text, vec![Value::Missing, Value::Missing]);
        let empty = Column::new("c", ColumnType::Integer, Vec::new());
        let varied = Column::new(
            "d",
            ColumnType::Float,
            vec![Value::Float(1.0), Value::Missing, Value::Float(2.0)],
        );
        assert!(is_constant(&single));
        assert!(is_constant(&missing));
        assert!(is_constant(&empty));
        assert!(!is_constant(&varied));
    }

    #[test]
    fn drops_constant_columns_and_keeps_order() {
        let table = Table::new(vec![
            Column::new("k", ColumnType::Integer, vec![Value::Int(1), Value::Int(2)]),
            Column::new("c", ColumnType::Text, vec![Value::from("x"), Value::from("x")]),
            Column::new("v", ColumnType::Bool, vec![Value::Bool(true), Value::Bool(false)]),
        ])
        .expect("table");
        let mut reporter = Reporter::new();
        let out = drop_constant_columns(table, &mut reporter);
        assert_eq!(out.column_names(), vec!["k", "v"]);
        assert_eq!(reporter.stages()[0].affected_columns, vec!["c".to_string()]);
    }

    #[test]
    fn all_constant_yields_zero_width_table() {
        let table = Table::new(vec![Column::new(
            "c",
            ColumnType::Integer,
            vec![Value::Int(5), Value::Int(5), Value::Int(5)],
        )])
        .expect("table");
        let out = drop_constant_columns(table, &mut Reporter::new());
        assert_eq!(out.column_count(), 0);
        assert_eq!(out.row_count(), 3);
    }
}
