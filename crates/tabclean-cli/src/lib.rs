//! Library side of the `tabclean` binary.
//!
//! [`pipeline::run_pipeline`] drives the ingest, transform and output crates
//! for one file; [`logging`] installs the tracing subscriber.

pub mod error;
pub mod logging;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{CleanOutcome, CleanRequest, default_output_path, run_pipeline};
