//! Missing-value handling.
//!
//! | Strategy   | Targets        | Effect                                        |
//! |------------|----------------|-----------------------------------------------|
//! | `drop`     | any            | remove rows missing a target cell             |
//! | `mean`     | numeric only   | fill with the mean of present values          |
//! | `median`   | numeric only   | fill with the median of present values        |
//! | `mode`     | any            | fill with the most frequent present value     |
//! | `constant` | any            | fill with the coerced user constant           |
//!
//! Columns with no present values are left alone by the statistical fills.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabclean_model::{Column, ColumnType, Table, Value};
use tracing::{debug, info};

use crate::coerce::coerce_fill_value;
use crate::error::{Result, TransformError};
use crate::key::{CellKey, compare_values};
use crate::report::{Reporter, Stage, StageSummary};
use crate::select::resolve_columns;

/// How missing cells in the target columns are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStrategy {
    Drop,
    Mean,
    Median,
    Mode,
    Constant,
}

impl MissingStrategy {
    pub const ALL: [MissingStrategy; 5] = [
        MissingStrategy::Drop,
        MissingStrategy::Mean,
        MissingStrategy::Median,
        MissingStrategy::Mode,
        MissingStrategy::Constant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Constant => "constant",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingStrategy {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| TransformError::UnknownStrategy {
                strategy: s.to_string(),
            })
    }
}

/// Parameters of the missing-value stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequest {
    pub strategy: MissingStrategy,
    /// Required by, and only used for, [`MissingStrategy::Constant`].
    pub fill_value: Option<String>,
    /// Target columns; `None` or empty targets every column.
    pub columns: Option<Vec<String>>,
}

impl MissingRequest {
    pub fn new(strategy: MissingStrategy) -> Self {
        Self {
            strategy,
            fill_value: None,
            columns: None,
        }
    }

    #[must_use]
    pub fn with_fill_value(mut self, fill_value: impl Into<String>) -> Self {
        self.fill_value = Some(fill_value.into());
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// Applies the requested strategy to the target columns.
///
/// # Errors
///
/// Returns [`TransformError::MissingFillValue`] for `constant` without a
/// fill value and [`TransformError::ColumnNotFound`] for an unknown target.
pub fn fill_missing(
    mut table: Table,
    request: &MissingRequest,
    reporter: &mut Reporter,
) -> Result<Table> {
    let strategy = request.strategy;
    let fill_value = match (strategy, request.fill_value.as_deref()) {
        (MissingStrategy::Constant, None) => return Err(TransformError::MissingFillValue),
        (MissingStrategy::Constant, Some(value)) => Some(value),
        (_, Some(value)) => {
            debug!(strategy = %strategy, value, "fill value ignored by strategy");
            None
        }
        (_, None) => None,
    };
    let targets = resolve_columns(&table, request.columns.as_deref(), Stage::Missing)?;

    let rows_before = table.row_count();
    let columns = table.column_count();
    let mut affected = Vec::new();
    let mut cells_filled = 0usize;

    if strategy == MissingStrategy::Drop {
        let keep = complete_rows(&table, &targets);
        table = table.filter_rows(&keep);
    } else {
        for idx in targets {
            let Some(column) = table.columns_mut().get_mut(idx) else {
                continue;
            };
            let filled = match strategy {
                MissingStrategy::Mean | MissingStrategy::Median => {
                    fill_statistic(column, strategy, reporter)
                }
                MissingStrategy::Mode => fill_mode(column, reporter),
                MissingStrategy::Constant => {
                    fill_constant(column, fill_value.unwrap_or_default(), reporter)
                }
                MissingStrategy::Drop => 0,
            };
            if filled > 0 {
                debug!(column = %column.name(), filled, "filled missing cells");
                affected.push(column.name().to_string());
                cells_filled += filled;
            }
        }
    }

    let summary = StageSummary {
        stage: Stage::Missing,
        detail: Some(strategy.to_string()),
        rows_before,
        rows_after: table.row_count(),
        columns_before: columns,
        columns_after: table.column_count(),
        affected_columns: affected,
        cells_filled,
    };
    info!(
        strategy = %strategy,
        rows_removed = summary.rows_removed(),
        cells_filled = summary.cells_filled,
        "handled missing values"
    );
    reporter.record_stage(summary);
    Ok(table)
}

fn complete_rows(table: &Table, targets: &[usize]) -> Vec<bool> {
    let columns = table.columns();
    (0..table.row_count())
        .map(|row| {
            targets.iter().all(|&idx| {
                columns
                    .get(idx)
                    .and_then(|column| column.values().get(row))
                    .is_some_and(|value| !value.is_missing())
            })
        })
        .collect()
}

fn replace_missing(column: &mut Column, value: &Value) -> usize {
    let mut filled = 0;
    for cell in column.values_mut() {
        if cell.is_missing() {
            *cell = value.clone();
            filled += 1;
        }
    }
    filled
}

fn fill_statistic(
    column: &mut Column,
    strategy: MissingStrategy,
    reporter: &mut Reporter,
) -> usize {
    if column.missing_count() == 0 {
        return 0;
    }
    if !column.dtype().is_numeric() {
        reporter.info(
            Stage::Missing,
            Some(column.name()),
            format!(
                "{} column has no {strategy}; missing cells left as is",
                column.dtype()
            ),
        );
        return 0;
    }
    let mut present: Vec<f64> = column.values().iter().filter_map(Value::as_f64).collect();
    let statistic = match strategy {
        MissingStrategy::Mean => mean(&present),
        _ => median(&mut present),
    };
    let Some(statistic) = statistic else {
        note_all_missing(column, reporter);
        return 0;
    };

    let fill = match column.dtype() {
        ColumnType::Integer => match integral(statistic) {
            Some(v) => Value::Int(v),
            None => {
                promote_to_float(column);
                Value::Float(statistic)
            }
        },
        _ => Value::Float(statistic),
    };
    replace_missing(column, &fill)
}

/// Mean of the values, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of the values (average of the middle pair for even counts).
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values.get(mid).copied()
    } else {
        let lower = values.get(mid - 1)?;
        let upper = values.get(mid)?;
        Some((lower + upper) / 2.0)
    }
}

fn integral(v: f64) -> Option<i64> {
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as i64)
}

fn promote_to_float(column: &mut Column) {
    debug!(column = %column.name(), "promoting integer column to float");
    for cell in column.values_mut() {
        if let Value::Int(v) = cell {
            *cell = Value::Float(*v as f64);
        }
    }
    column.set_dtype(ColumnType::Float);
}

fn fill_mode(column: &mut Column, reporter: &mut Reporter) -> usize {
    if column.missing_count() == 0 {
        return 0;
    }
    match mode(column.values()) {
        Some(value) => replace_missing(column, &value),
        None => {
            note_all_missing(column, reporter);
            0
        }
    }
}

fn note_all_missing(column: &Column, reporter: &mut Reporter) {
    reporter.info(
        Stage::Missing,
        Some(column.name()),
        "every value is missing; nothing to fill from",
    );
}

/// Most frequent non-missing value; ties go to the smallest value.
pub fn mode(values: &[Value]) -> Option<Value> {
    let mut counts: HashMap<CellKey<'_>, (usize, &Value)> = HashMap::new();
    for value in values {
        let key = CellKey::of(value);
        if key.is_missing() {
            continue;
        }
        counts.entry(key).or_insert((0, value)).0 += 1;
    }
    counts
        .into_values()
        .max_by(|(count_a, a), (count_b, b)| {
            count_a.cmp(count_b).then_with(|| compare_values(b, a))
        })
        .map(|(_, value)| value.clone())
}

fn fill_constant(column: &mut Column, raw: &str, reporter: &mut Reporter) -> usize {
    if column.missing_count() == 0 {
        return 0;
    }
    let coerced = coerce_fill_value(column.dtype(), raw);
    if coerced.degraded {
        reporter.warn(
            Stage::Missing,
            Some(column.name()),
            format!(
                "fill value '{raw}' is not a valid {} for column '{}'; stored as text",
                column.dtype(),
                column.name()
            ),
        );
    }
    replace_missing(column, &coerced.value)
}
