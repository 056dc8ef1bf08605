//! State module for tracking download progress
//!
//! # Components
//!
//! - `DownloadState`: where a single transfer is in the gate sequence
//! - `SkipReason` / `FailureReason`: why a transfer stopped early
//! - `DownloadOutcome` / `DownloadRecord`: terminal result of one attempt

mod download_state;

// Re-export main types
pub use download_state::{
    DownloadOutcome, DownloadRecord, DownloadState, FailureReason, SkipReason,
};
