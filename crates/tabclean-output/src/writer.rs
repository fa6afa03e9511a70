//! Delimited text serialization.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tabclean_model::{Delimiter, Table, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{OutputError, Result};

/// Output delimiter for a destination: tab for `.tsv`/`.txt`, comma otherwise.
pub fn output_delimiter(path: &Path) -> Delimiter {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("tsv" | "txt") => Delimiter::Tab,
        _ => Delimiter::Comma,
    }
}

/// Writes `table` to `path` and returns the delimiter used.
///
/// Missing parent directories are created. Data goes to a temporary file
/// next to the destination that is renamed into place only after every row
/// was written, so a failure never leaves a partial file at `path`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written or renamed.
pub fn write_table(table: &Table, path: &Path) -> Result<Delimiter> {
    let delimiter = output_delimiter(path);
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let write_err = |source: io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut staged = NamedTempFile::new_in(parent).map_err(write_err)?;
    debug!(
        staging = %staged.path().display(),
        destination = %path.display(),
        delimiter = %delimiter,
        "writing table"
    );
    write_delimited(table, delimiter, staged.as_file_mut()).map_err(write_err)?;
    staged
        .persist(path)
        .map_err(|error| write_err(error.error))?;

    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "wrote table"
    );
    Ok(delimiter)
}

/// Serializes header and rows to any writer.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_delimited<W: Write>(table: &Table, delimiter: Delimiter, out: W) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(out);
    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        let record: Vec<Cow<'_, str>> = table.row(row).map(render_value).collect();
        writer.write_record(record.iter().map(|cell| cell.as_bytes()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Text form of a cell; missing cells become empty fields.
pub fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Missing => Cow::Borrowed(""),
        Value::Int(v) => Cow::Owned(v.to_string()),
        Value::Float(v) => Cow::Owned(format_float(*v)),
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        Value::Text(v) => Cow::Borrowed(v),
    }
}

/// Shortest round-trip form, keeping a `.0` on integral values.
pub fn format_float(v: f64) -> String {
    let text = v.to_string();
    if v.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{text}.0")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_follows_extension() {
        assert_eq!(output_delimiter(Path::new("out.tsv")), Delimiter::Tab);
        assert_eq!(output_delimiter(Path::new("OUT.TXT")), Delimiter::Tab);
        assert_eq!(output_delimiter(Path::new("out.csv")), Delimiter::Comma);
        assert_eq!(output_delimiter(Path::new("out")), Delimiter::Comma);
        assert_eq!(output_delimiter(Path::new("out.psv")), Delimiter::Comma);
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(1e21), "1000000000000000000000.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn renders_each_variant() {
        assert_eq!(render_value(&Value::Missing), "");
        assert_eq!(render_value(&Value::Int(-3)), "-3");
        assert_eq!(render_value(&Value::Bool(false)), "False");
        assert_eq!(render_value(&Value::from("a b")), "a b");
    }
}
