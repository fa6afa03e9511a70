//! Cleaning stages for tabclean.
//!
//! Each stage takes a [`tabclean_model::Table`] by value and returns the
//! cleaned table, recording what it did in a caller-owned [`Reporter`]:
//!
//! - [`remove_duplicates`]: drop repeated rows, keeping first occurrences
//! - [`drop_constant_columns`]: drop columns with at most one distinct value
//! - [`fill_missing`]: drop or fill missing cells by strategy
//!
//! Stages share no state; the caller decides which to run and in what order.

mod coerce;
mod constant;
mod dedup;
mod error;
mod key;
mod missing;
mod report;
mod select;

pub use coerce::{Coerced, coerce_fill_value};
pub use constant::{drop_constant_columns, is_constant};
pub use dedup::{NullEquality, remove_duplicates};
pub use error::{Result, TransformError};
pub use missing::{MissingRequest, MissingStrategy, fill_missing, mean, median, mode};
pub use report::{Diagnostic, Reporter, Severity, Stage, StageSummary};
