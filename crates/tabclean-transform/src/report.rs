//! Per-run stage reporting.
//!
//! Stages push what they did into a [`Reporter`] owned by the caller instead
//! of writing to a shared sink. Every diagnostic is also emitted as a
//! `tracing` event.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Identifies a cleaning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Dedup,
    DropConstant,
    Missing,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dedup => "dedup",
            Self::DropConstant => "drop_constant",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape change and effect of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: Stage,
    /// Free-form qualifier, e.g. the imputation strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Columns removed or filled by the stage.
    pub affected_columns: Vec<String>,
    /// Missing cells replaced by the stage.
    pub cells_filled: usize,
}

impl StageSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    pub fn columns_removed(&self) -> usize {
        self.columns_before.saturating_sub(self.columns_after)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal observation made while running a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

/// Collects stage summaries and diagnostics for a single pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    stages: Vec<StageSummary>,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_stage(&mut self, summary: StageSummary) {
        self.stages.push(summary);
    }

    pub fn warn(&mut self, stage: Stage, column: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        warn!(stage = %stage, column = column.unwrap_or("-"), "{message}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            stage,
            column: column.map(str::to_string),
            message,
        });
    }

    pub fn info(&mut self, stage: Stage, column: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        info!(stage = %stage, column = column.unwrap_or("-"), "{message}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Info,
            stage,
            column: column.map(str::to_string),
            message,
        });
    }

    pub fn stages(&self) -> &[StageSummary] {
        &self.stages
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn into_parts(self) -> (Vec<StageSummary>, Vec<Diagnostic>) {
        (self.stages, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_counted() {
        let mut reporter = Reporter::new();
        reporter.info(Stage::Missing, Some("name"), "left unchanged");
        reporter.warn(Stage::Missing, Some("age"), "fill value 'x' kept as text");
        assert_eq!(reporter.warning_count(), 1);
        assert_eq!(reporter.diagnostics()[0].severity, Severity::Info);
        assert_eq!(reporter.diagnostics()[1].column.as_deref(), Some("age"));
    }

    #[test]
    fn summary_serializes_without_empty_detail() {
        let summary = StageSummary {
            stage: Stage::DropConstant,
            detail: None,
            rows_before: 3,
            rows_after: 3,
            columns_before: 4,
            columns_after: 2,
            affected_columns: vec!["c".to_string(), "d".to_string()],
            cells_filled: 0,
        };
        let json = serde_json::to_value(&summary).expect("serialize summary");
        assert_eq!(json["stage"], "drop_constant");
        assert!(json.get("detail").is_none());
        assert_eq!(summary.columns_removed(), 2);
    }
}
