use std::collections::BTreeSet;

use crate::error::{ModelError, Result};
use crate::value::{ColumnType, Value};

/// A named, typed sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    /// Changes the declared type. Only numeric promotion uses this.
    pub fn set_dtype(&mut self, dtype: ColumnType) {
        self.dtype = dtype;
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Mutable cells; a slice so the column length cannot change.
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_missing()).count()
    }

    fn keep_rows(self, keep: &[bool]) -> Self {
        let values = self
            .values
            .into_iter()
            .zip(keep.iter().copied())
            .filter_map(|(value, kept)| kept.then_some(value))
            .collect();
        Self {
            name: self.name,
            dtype: self.dtype,
            values,
        }
    }
}

/// Ordered collection of uniquely named, equal-length columns.
///
/// The row count is stored separately so a table whose columns were all
/// removed still remembers how many rows it has.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table, taking the row count from the first column.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate names or unequal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        Self::with_row_count(columns, row_count)
    }

    /// Builds a table with an explicit row count (needed for zero-width tables).
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate names or when a column length differs
    /// from `row_count`.
    pub fn with_row_count(columns: Vec<Column>, row_count: usize) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
            if column.len() != row_count {
                return Err(ModelError::LengthMismatch {
                    name: column.name.clone(),
                    expected: row_count,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Cells of one row in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns
            .iter()
            .filter_map(move |column| column.values.get(index))
    }

    /// Keeps the rows whose mask entry is `true`, preserving order.
    ///
    /// Rows beyond the end of `keep` are dropped.
    pub fn filter_rows(self, keep: &[bool]) -> Self {
        let row_count = keep
            .iter()
            .take(self.row_count)
            .filter(|kept| **kept)
            .count();
        let columns = self
            .columns
            .into_iter()
            .map(|column| column.keep_rows(keep))
            .collect();
        Self { columns, row_count }
    }

    /// Removes the named columns; unknown names are ignored.
    pub fn drop_columns(self, names: &BTreeSet<String>) -> Self {
        let columns = self
            .columns
            .into_iter()
            .filter(|column| !names.contains(&column.name))
            .collect();
        Self {
            columns,
            row_count: self.row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(name: &str, values: &[Option<i64>]) -> Column {
        Column::new(
            name,
            ColumnType::Integer,
            values.iter().copied().map(Value::from).collect(),
        )
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Table::new(vec![ints("a", &[Some(1)]), ints("a", &[Some(2)])]);
        assert_eq!(
            result,
            Err(ModelError::DuplicateColumn {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn rejects_ragged_columns() {
        let result = Table::new(vec![ints("a", &[Some(1)]), ints("b", &[Some(1), None])]);
        assert!(matches!(result, Err(ModelError::LengthMismatch { .. })));
    }

    #[test]
    fn filter_rows_preserves_order() {
        let table = Table::new(vec![ints("a", &[Some(1), Some(2), Some(3)])]).expect("table");
        let filtered = table.filter_rows(&[true, false, true]);
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(
            filtered.columns()[0].values(),
            &[Value::Int(1), Value::Int(3)]
        );
    }

    #[test]
    fn dropping_every_column_keeps_row_count() {
        let table = Table::new(vec![ints("a", &[Some(1), Some(1)])]).expect("table");
        let names = BTreeSet::from(["a".to_string()]);
        let empty = table.drop_columns(&names);
        assert_eq!(empty.column_count(), 0);
        assert_eq!(empty.row_count(), 2);
    }

    #[test]
    fn row_iterates_in_column_order() {
        let table = Table::new(vec![ints("a", &[Some(1)]), ints("b", &[None])]).expect("table");
        let row: Vec<&Value> = table.row(0).collect();
        assert_eq!(row, vec![&Value::Int(1), &Value::Missing]);
    }
}
