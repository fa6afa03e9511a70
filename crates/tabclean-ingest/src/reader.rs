//! Delimited text loading with per-column type inference.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tabclean_model::{Column, ColumnType, Delimiter, MissingTokens, Table, Value};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::sniff::{DEFAULT_SNIFF_BYTES, sniff_delimiter};

/// How the effective input delimiter was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterSource {
    /// Supplied by the caller.
    Forced,
    /// Inferred from the file sample.
    Detected,
    /// Detection was inconclusive; comma was assumed.
    Fallback,
}

/// Options controlling [`load_table`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit delimiter; skips detection when set.
    pub delimiter: Option<Delimiter>,
    /// Bytes sampled for detection.
    pub sniff_bytes: usize,
    /// Cell texts that load as missing.
    pub missing_tokens: MissingTokens,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            missing_tokens: MissingTokens::default(),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Option<Delimiter>) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_sniff_bytes(mut self, bytes: usize) -> Self {
        self.sniff_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_missing_tokens(mut self, tokens: MissingTokens) -> Self {
        self.missing_tokens = tokens;
        self
    }
}

/// A loaded table plus how it was parsed.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub delimiter: Delimiter,
    pub delimiter_source: DelimiterSource,
}

/// Picks the delimiter: explicit, then detected, then comma.
///
/// # Errors
///
/// Returns an error if detection needs to read the file and cannot.
pub fn resolve_delimiter(
    path: &Path,
    options: &LoadOptions,
) -> Result<(Delimiter, DelimiterSource)> {
    if let Some(delimiter) = options.delimiter {
        return Ok((delimiter, DelimiterSource::Forced));
    }
    match sniff_delimiter(path, options.sniff_bytes)? {
        Some(delimiter) => Ok((delimiter, DelimiterSource::Detected)),
        None => Ok((Delimiter::Comma, DelimiterSource::Fallback)),
    }
}

/// Parses the whole file into a typed [`Table`].
///
/// The first record names the columns. Short rows are padded with missing
/// cells and trailing empty fields beyond the header are discarded; any
/// other extra field is an error.
///
/// # Errors
///
/// Returns [`IngestError::InputNotFound`] for a missing path, and a load
/// error for unreadable or undecodable content, an empty file, duplicate
/// column names, or rows wider than the header.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<LoadedTable> {
    if !path.is_file() {
        return Err(IngestError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let (delimiter, delimiter_source) = resolve_delimiter(path, options)?;
    debug!(
        path = %path.display(),
        delimiter = %delimiter,
        source = ?delimiter_source,
        "resolved input delimiter"
    );

    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| IngestError::from_csv(path, e))?,
        None => {
            return Err(IngestError::EmptyInput {
                path: path.to_path_buf(),
            });
        }
    };
    let headers = parse_headers(path, &header)?;

    let width = headers.len();
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for record in records {
        let record = record.map_err(|e| IngestError::from_csv(path, e))?;
        if record.len() > width && record.iter().skip(width).any(|field| !field.is_empty()) {
            return Err(IngestError::RaggedRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, csv::Position::line),
                expected: width,
                found: record.len(),
            });
        }
        for (idx, cells) in raw.iter_mut().enumerate() {
            let cell = record
                .get(idx)
                .filter(|cell| !options.missing_tokens.is_missing(cell))
                .map(str::to_string);
            cells.push(cell);
        }
    }

    let row_count = raw.first().map_or(0, Vec::len);
    let columns: Vec<Column> = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| build_column(name, &cells))
        .collect();
    let table = Table::with_row_count(columns, row_count).map_err(|source| IngestError::Table {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        delimiter = %delimiter,
        "loaded table"
    );
    Ok(LoadedTable {
        table,
        delimiter,
        delimiter_source,
    })
}

fn parse_headers(path: &Path, header: &csv::StringRecord) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::with_capacity(header.len());
    for (idx, raw) in header.iter().enumerate() {
        let name = if idx == 0 {
            raw.trim_start_matches('\u{feff}')
        } else {
            raw
        };
        if !seen.insert(name) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            });
        }
        headers.push(name.to_string());
    }
    Ok(headers)
}

fn build_column(name: String, cells: &[Option<String>]) -> Column {
    let dtype = infer_column_type(cells.iter().flatten().map(String::as_str));
    let values = cells
        .iter()
        .map(|cell| match cell {
            Some(text) => parse_cell(dtype, text),
            None => Value::Missing,
        })
        .collect();
    debug!(column = %name, dtype = %dtype, "inferred column type");
    Column::new(name, dtype, values)
}

/// Infers a column type from its non-missing cell texts.
///
/// Integer beats float beats bool; anything else (or no cells at all) is text.
/// A whole number outside the `i64` range makes the column text, since a
/// float could not write it back unchanged.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    for cell in cells {
        any = true;
        let int = parse_int(cell);
        if int.is_none() && is_integer_literal(cell) {
            return ColumnType::Text;
        }
        all_int = all_int && int.is_some();
        all_float = all_float && parse_float(cell).is_some();
        all_bool = all_bool && parse_bool(cell).is_some();
        if !(all_int || all_float || all_bool) {
            return ColumnType::Text;
        }
    }
    if !any {
        ColumnType::Text
    } else if all_int {
        ColumnType::Integer
    } else if all_float {
        ColumnType::Float
    } else if all_bool {
        ColumnType::Bool
    } else {
        ColumnType::Text
    }
}

/// Converts one non-missing cell to the column's type.
pub fn parse_cell(dtype: ColumnType, text: &str) -> Value {
    let parsed = match dtype {
        ColumnType::Integer => parse_int(text).map(Value::Int),
        ColumnType::Float => parse_float(text).map(Value::Float),
        ColumnType::Bool => parse_bool(text).map(Value::Bool),
        ColumnType::Text => None,
    };
    parsed.unwrap_or_else(|| Value::Text(text.to_string()))
}

fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Optional sign followed by ASCII digits only.
fn is_integer_literal(text: &str) -> bool {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_integer_before_float() {
        assert_eq!(infer_column_type(["1", "-2", "+3"]), ColumnType::Integer);
        assert_eq!(infer_column_type(["1", "2.5"]), ColumnType::Float);
        assert_eq!(infer_column_type(["1e3", "inf"]), ColumnType::Float);
    }

    #[test]
    fn oversized_whole_numbers_stay_text() {
        assert_eq!(
            infer_column_type(["12345678901234567891", "2"]),
            ColumnType::Text
        );
        assert_eq!(
            infer_column_type(["-9223372036854775808", "9223372036854775807"]),
            ColumnType::Integer
        );
        assert!(is_integer_literal(" +42 "));
        assert!(!is_integer_literal("4.2"));
        assert!(!is_integer_literal("-"));
    }

    #[test]
    fn infers_bool_and_text() {
        assert_eq!(infer_column_type(["True", "false"]), ColumnType::Bool);
        assert_eq!(infer_column_type(["yes", "no"]), ColumnType::Text);
        assert_eq!(infer_column_type(["1", "x"]), ColumnType::Text);
        assert_eq!(infer_column_type(["1", "true"]), ColumnType::Text);
    }

    #[test]
    fn no_cells_means_text() {
        assert_eq!(infer_column_type(std::iter::empty()), ColumnType::Text);
    }

    #[test]
    fn nan_literal_is_not_a_float() {
        assert_eq!(infer_column_type(["NAN", "1.5"]), ColumnType::Text);
    }

    #[test]
    fn parse_cell_follows_dtype() {
        assert_eq!(parse_cell(ColumnType::Integer, " 7 "), Value::Int(7));
        assert_eq!(parse_cell(ColumnType::Float, "7"), Value::Float(7.0));
        assert_eq!(parse_cell(ColumnType::Bool, "TRUE"), Value::Bool(true));
        assert_eq!(parse_cell(ColumnType::Text, "7"), Value::from("7"));
    }
}
