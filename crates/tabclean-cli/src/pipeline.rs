//! Load, clean and write a single table.
//!
//! Stages always run in the same order: deduplication, constant-column
//! pruning, then missing-value handling. Each one is opt-in.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tabclean_ingest::{DelimiterSource, LoadOptions, load_table};
use tabclean_model::Delimiter;
use tabclean_output::write_table;
use tabclean_transform::{
    Diagnostic, MissingRequest, MissingStrategy, NullEquality, Reporter, StageSummary,
    drop_constant_columns, fill_missing, remove_duplicates,
};
use tracing::{debug, info_span};

use crate::error::PipelineError;

/// Everything a single cleaning run needs.
#[derive(Debug, Clone, Default)]
pub struct CleanRequest {
    pub input: PathBuf,
    /// Destination; defaults to [`default_output_path`].
    pub output: Option<PathBuf>,
    /// Skips delimiter detection when set.
    pub force_delimiter: Option<Delimiter>,
    pub dedup: bool,
    /// Comparison columns for dedup; `None` compares whole rows.
    pub dedup_columns: Option<Vec<String>>,
    pub dedup_nulls: NullEquality,
    pub drop_constant_columns: bool,
    /// Strategy name, validated when the run starts.
    pub missing_strategy: Option<String>,
    pub missing_fill_value: Option<String>,
    pub missing_columns: Option<Vec<String>>,
}

impl CleanRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.force_delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_dedup(mut self, columns: Option<Vec<String>>) -> Self {
        self.dedup = true;
        self.dedup_columns = columns;
        self
    }

    #[must_use]
    pub fn with_drop_constant_columns(mut self) -> Self {
        self.drop_constant_columns = true;
        self
    }

    #[must_use]
    pub fn with_missing(
        mut self,
        strategy: impl Into<String>,
        fill_value: Option<String>,
        columns: Option<Vec<String>>,
    ) -> Self {
        self.missing_strategy = Some(strategy.into());
        self.missing_fill_value = fill_value;
        self.missing_columns = columns;
        self
    }

    /// Output path after applying the default.
    pub fn resolved_output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// `cleaned_<basename>` in the working directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    PathBuf::from(format!("cleaned_{name}"))
}

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct CleanOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_delimiter: Delimiter,
    pub delimiter_source: DelimiterSource,
    pub output_delimiter: Delimiter,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_in: usize,
    pub columns_out: usize,
    pub stages: Vec<StageSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the requested stages and writes the result.
///
/// Nothing is written unless every stage succeeds.
///
/// # Errors
///
/// Returns the first stage failure; see [`PipelineError::exit_code`].
pub fn run_pipeline(request: &CleanRequest) -> Result<CleanOutcome, PipelineError> {
    let missing = missing_request(request)?;
    let output_path = request.resolved_output();

    let loaded = {
        let _span = info_span!("stage", name = "load").entered();
        let options = LoadOptions::default().with_delimiter(request.force_delimiter);
        load_table(&request.input, &options)?
    };
    let rows_in = loaded.table.row_count();
    let columns_in = loaded.table.column_count();

    let mut reporter = Reporter::new();
    let mut table = loaded.table;

    if request.dedup {
        let _span = info_span!("stage", name = "dedup").entered();
        table = remove_duplicates(
            table,
            request.dedup_columns.as_deref(),
            request.dedup_nulls,
            &mut reporter,
        )
        .map_err(PipelineError::Dedup)?;
    }

    if request.drop_constant_columns {
        let _span = info_span!("stage", name = "drop_constant").entered();
        table = drop_constant_columns(table, &mut reporter);
    }

    if let Some(missing) = &missing {
        let _span = info_span!("stage", name = "missing").entered();
        table = fill_missing(table, missing, &mut reporter).map_err(PipelineError::Missing)?;
    }

    let output_delimiter = {
        let _span = info_span!("stage", name = "write").entered();
        write_table(&table, &output_path)?
    };

    let (stages, diagnostics) = reporter.into_parts();
    Ok(CleanOutcome {
        input_path: request.input.clone(),
        output_path,
        input_delimiter: loaded.delimiter,
        delimiter_source: loaded.delimiter_source,
        output_delimiter,
        rows_in,
        rows_out: table.row_count(),
        columns_in,
        columns_out: table.column_count(),
        stages,
        diagnostics,
    })
}

/// Parses the strategy up front so a typo fails before any I/O.
fn missing_request(request: &CleanRequest) -> Result<Option<MissingRequest>, PipelineError> {
    let Some(raw) = request.missing_strategy.as_deref() else {
        return Ok(None);
    };
    let strategy: MissingStrategy = raw.parse().map_err(PipelineError::Missing)?;
    debug!(strategy = %strategy, "missing-value handling requested");
    let mut missing = MissingRequest::new(strategy);
    missing.fill_value = request.missing_fill_value.clone();
    missing.columns = request.missing_columns.clone();
    Ok(Some(missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn default_output_uses_basename() {
        assert_eq!(
            default_output_path(Path::new("data/raw/survey.tsv")),
            PathBuf::from("cleaned_survey.tsv")
        );
        assert_eq!(
            default_output_path(Path::new("x.csv")),
            PathBuf::from("cleaned_x.csv")
        );
    }

    #[test]
    fn explicit_output_wins() {
        let request = CleanRequest::new("in.csv").with_output("out/clean.csv");
        assert_eq!(request.resolved_output(), PathBuf::from("out/clean.csv"));
        assert_eq!(
            CleanRequest::new("in.csv").resolved_output(),
            PathBuf::from("cleaned_in.csv")
        );
    }

    #[test]
    fn unknown_strategy_fails_before_loading() {
        let request = CleanRequest::new("does/not/exist.csv").with_missing("bogus", None, None);
        let error = run_pipeline(&request).unwrap_err();
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn load_is_logged_once_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        std::fs::write(&input, "a,b\n1,2\n").unwrap();
        let request = CleanRequest::new(&input).with_output(dir.path().join("out.csv"));

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || run_pipeline(&request)).unwrap();

        let text = logs.text();
        assert_eq!(text.matches("loaded").count(), 1, "{text}");
        assert_eq!(text.matches("wrote table").count(), 1, "{text}");
    }
}
