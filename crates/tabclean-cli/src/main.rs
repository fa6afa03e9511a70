//! tabclean command-line entry point.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tabclean_cli::logging::{LogConfig, LogFormat, init_logging};
use tabclean_cli::{CleanRequest, run_pipeline};
use tracing::level_filters::LevelFilter;
use tracing::error;

mod cli;
mod summary;

use crate::cli::{Cli, LogFormatArg, LogLevelArg, SummaryFormatArg};
use crate::summary::{print_json, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let request = request_from_cli(&cli);
    let exit_code = match run_pipeline(&request) {
        Ok(outcome) => match cli.summary {
            SummaryFormatArg::Json => match print_json(&outcome) {
                Ok(()) => 0,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            },
            SummaryFormatArg::Table => {
                print_summary(&outcome);
                println!("Wrote cleaned file: {}", outcome.output_path.display());
                0
            }
            SummaryFormatArg::None => {
                println!("Wrote cleaned file: {}", outcome.output_path.display());
                0
            }
        },
        Err(failure) => {
            error!(category = failure.category(), "pipeline failed");
            eprintln!("error: {failure}");
            failure.exit_code()
        }
    };
    std::process::exit(exit_code);
}

fn request_from_cli(cli: &Cli) -> CleanRequest {
    CleanRequest {
        input: cli.input.clone(),
        output: cli.out.clone(),
        force_delimiter: cli.sep,
        dedup: cli.dedup,
        dedup_columns: cli.dedup_cols.clone(),
        dedup_nulls: cli.dedup_nulls.into(),
        drop_constant_columns: cli.drop_const,
        missing_strategy: cli.missing.clone(),
        missing_fill_value: cli.fill.clone(),
        missing_columns: cli.missing_cols.clone(),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_ansi(with_ansi)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}
