//! CLI argument definitions for tabclean.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tabclean_model::Delimiter;
use tabclean_transform::NullEquality;

#[derive(Parser)]
#[command(
    name = "tabclean",
    version,
    about = "Clean a delimited data file: dedup rows, prune constant columns, handle missing values",
    long_about = "Clean a CSV/TSV file and write the result.\n\n\
                  The input delimiter is detected unless --sep is given. Stages run in\n\
                  a fixed order: --dedup, --drop-const, then --missing. Output to a\n\
                  .tsv or .txt path is tab-separated, anything else comma-separated."
)]
pub struct Cli {
    /// Input file (CSV, TSV, or other delimited text).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: cleaned_<INPUT basename> in the working directory).
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Input delimiter: ',', ';', '|', '\t', or comma/semicolon/pipe/tab.
    #[arg(long = "sep", value_name = "SEP")]
    pub sep: Option<Delimiter>,

    /// Remove duplicate rows, keeping the first occurrence.
    #[arg(long = "dedup")]
    pub dedup: bool,

    /// Columns compared by --dedup (default: all columns).
    #[arg(long = "dedup-cols", value_name = "COL", num_args = 1..)]
    pub dedup_cols: Option<Vec<String>>,

    /// Whether two missing cells count as equal when deduplicating.
    #[arg(long = "dedup-nulls", value_enum, default_value = "equal")]
    pub dedup_nulls: DedupNullsArg,

    /// Drop columns with at most one distinct non-missing value.
    #[arg(long = "drop-const")]
    pub drop_const: bool,

    /// Missing-value strategy: drop, mean, median, mode, or constant.
    #[arg(long = "missing", value_name = "STRATEGY")]
    pub missing: Option<String>,

    /// Fill value for the constant strategy.
    #[arg(long = "fill", value_name = "VALUE", allow_hyphen_values = true)]
    pub fill: Option<String>,

    /// Columns targeted by --missing (default: all columns).
    #[arg(long = "missing-cols", value_name = "COL", num_args = 1..)]
    pub missing_cols: Option<Vec<String>>,

    /// How to report the run on stdout.
    #[arg(long = "summary", value_enum, default_value = "table")]
    pub summary: SummaryFormatArg,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DedupNullsArg {
    Equal,
    Distinct,
}

impl From<DedupNullsArg> for NullEquality {
    fn from(arg: DedupNullsArg) -> Self {
        match arg {
            DedupNullsArg::Equal => NullEquality::Equal,
            DedupNullsArg::Distinct => NullEquality::Distinct,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormatArg {
    Table,
    Json,
    None,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cleaning_flags() {
        let cli = Cli::try_parse_from([
            "tabclean",
            "data.csv",
            "--sep",
            "tab",
            "--dedup",
            "--dedup-cols",
            "id",
            "name",
            "--missing",
            "constant",
            "--fill",
            "-1",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("data.csv"));
        assert_eq!(cli.sep, Some(Delimiter::Tab));
        assert!(cli.dedup);
        assert_eq!(
            cli.dedup_cols,
            Some(vec!["id".to_string(), "name".to_string()])
        );
        assert_eq!(cli.missing.as_deref(), Some("constant"));
        assert_eq!(cli.fill.as_deref(), Some("-1"));
        assert!(cli.summary == SummaryFormatArg::Table);
    }

    #[test]
    fn rejects_unknown_separator() {
        assert!(Cli::try_parse_from(["tabclean", "data.csv", "--sep", "::"]).is_err());
    }

    #[test]
    fn missing_strategy_is_free_text() {
        let cli = Cli::try_parse_from(["tabclean", "data.csv", "--missing", "bogus"]).unwrap();
        assert_eq!(cli.missing.as_deref(), Some("bogus"));
    }
}
