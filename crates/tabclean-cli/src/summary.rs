use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use anyhow::Context;
use tabclean_cli::CleanOutcome;
use tabclean_ingest::DelimiterSource;
use tabclean_transform::{Severity, StageSummary};

pub fn print_summary(outcome: &CleanOutcome) {
    println!("Input: {}", outcome.input_path.display());
    println!(
        "Delimiter: {} ({})",
        outcome.input_delimiter.name(),
        source_label(outcome)
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Detail"),
        header_cell("Rows"),
        header_cell("Removed"),
        header_cell("Columns"),
        header_cell("Dropped"),
        header_cell("Filled"),
        header_cell("Affected"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [2, 3, 4, 5, 6] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for stage in &outcome.stages {
        table.add_row(stage_row(stage));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} → {}", outcome.rows_in, outcome.rows_out))
            .add_attribute(Attribute::Bold),
        count_cell(outcome.rows_in.saturating_sub(outcome.rows_out), Color::Yellow),
        Cell::new(format!("{} → {}", outcome.columns_in, outcome.columns_out))
            .add_attribute(Attribute::Bold),
        count_cell(
            outcome.columns_in.saturating_sub(outcome.columns_out),
            Color::Yellow,
        ),
        count_cell(
            outcome.stages.iter().map(|stage| stage.cells_filled).sum(),
            Color::Green,
        ),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_diagnostics(outcome);
}

/// Writes the outcome as pretty JSON on stdout.
pub fn print_json(outcome: &CleanOutcome) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serialize run summary")?;
    println!("{json}");
    Ok(())
}

fn print_diagnostics(outcome: &CleanOutcome) {
    if outcome.diagnostics.is_empty() {
        return;
    }
    eprintln!("Diagnostics:");
    for diagnostic in &outcome.diagnostics {
        let label = match diagnostic.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        match &diagnostic.column {
            Some(column) => eprintln!(
                "- [{label}] {} / {column}: {}",
                diagnostic.stage, diagnostic.message
            ),
            None => eprintln!("- [{label}] {}: {}", diagnostic.stage, diagnostic.message),
        }
    }
}

fn stage_row(stage: &StageSummary) -> Vec<Cell> {
    vec![
        Cell::new(stage.stage.as_str()).add_attribute(Attribute::Bold),
        stage
            .detail
            .as_deref()
            .map_or_else(|| dim_cell("-"), Cell::new),
        Cell::new(format!("{} → {}", stage.rows_before, stage.rows_after)),
        count_cell(stage.rows_removed(), Color::Yellow),
        Cell::new(format!("{} → {}", stage.columns_before, stage.columns_after)),
        count_cell(stage.columns_removed(), Color::Yellow),
        count_cell(stage.cells_filled, Color::Green),
        if stage.affected_columns.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(stage.affected_columns.join(", "))
        },
    ]
}

fn source_label(outcome: &CleanOutcome) -> &'static str {
    match outcome.delimiter_source {
        DelimiterSource::Forced => "forced",
        DelimiterSource::Detected => "detected",
        DelimiterSource::Fallback => "fallback",
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
