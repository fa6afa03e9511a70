//! Table ingestion for tabclean.
//!
//! This crate turns a delimited text file into a typed [`tabclean_model::Table`].
//!
//! # Features
//!
//! - **Delimiter detection**: infer comma, tab, semicolon or pipe from a byte sample
//! - **Loading**: parse the full file with a forced, detected or fallback delimiter
//! - **Type inference**: integer, float, bool or text per column
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tabclean_ingest::{LoadOptions, load_table};
//!
//! let loaded = load_table(Path::new("data.csv"), &LoadOptions::default())?;
//! println!("{} rows, delimiter {}", loaded.table.row_count(), loaded.delimiter);
//! # Ok::<(), tabclean_ingest::IngestError>(())
//! ```

mod error;
mod reader;
mod sniff;

// === Error Types ===
pub use error::{IngestError, Result};

// === Detection ===
pub use sniff::{DEFAULT_SNIFF_BYTES, sniff_delimiter, sniff_sample};

// === Loading ===
pub use reader::{
    DelimiterSource, LoadOptions, LoadedTable, infer_column_type, load_table, parse_cell,
    resolve_delimiter,
};
