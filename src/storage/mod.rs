//! Storage module for downloaded documents
//!
//! This module owns everything that touches the output directory:
//! - Creating it with the configured permissions
//! - Mapping document URLs to destination paths
//! - Cleaning up partially written files
//! - Verifying the structure of files already on disk

mod local;
mod verify;

pub use local::{directory_exists, file_exists, OutputDirectory, PartialFileGuard};
pub use verify::{
    check_pdf_bytes, check_pdf_file, print_verify_report, verify_directory, PdfCheck,
    VerifiedFile, VerifyError, VerifyReport,
};
