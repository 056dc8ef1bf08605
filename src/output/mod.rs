//! Output module for run summaries and reports
//!
//! This module handles:
//! - Tallying the outcome of every candidate in a run
//! - Printing run statistics
//! - Writing an optional markdown report

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{print_statistics, RejectedCandidate, RunStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
