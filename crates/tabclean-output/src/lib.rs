//! Table serialization for tabclean.
//!
//! The output delimiter is chosen from the destination extension and files
//! are written atomically through a staging file in the same directory.

mod error;
mod writer;

pub use error::{OutputError, Result};
pub use writer::{format_float, output_delimiter, render_value, write_delimited, write_table};
