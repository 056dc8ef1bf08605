//! Structural verification of downloaded documents
//!
//! The download path never inspects content bytes, so a server that answers
//! `application/pdf` with an error page still produces a file. This pass scans
//! the output directory afterwards and flags (optionally deletes) files that
//! are not plausibly PDFs.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How far from each end of the file the header and trailer are searched
const MARKER_WINDOW: usize = 1024;

static PAGE_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)/Type\s*/Page\b").expect("page object pattern is valid")
});

/// Errors that can occur while verifying a directory
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Cannot read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },
}

/// Result of checking one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfCheck {
    Valid,
    /// The file could not be read
    Unreadable(String),
    /// No `%PDF-` header near the start
    MissingHeader,
    /// No `%%EOF` marker near the end
    MissingTrailer,
    /// Structurally a PDF, but no page objects
    NoPages,
}

impl PdfCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Valid => "valid".to_string(),
            Self::Unreadable(e) => format!("unreadable: {}", e),
            Self::MissingHeader => "missing %PDF- header".to_string(),
            Self::MissingTrailer => "missing %%EOF trailer".to_string(),
            Self::NoPages => "no pages".to_string(),
        }
    }
}

/// Checks raw bytes for the basic structure of a PDF document
pub fn check_pdf_bytes(bytes: &[u8]) -> PdfCheck {
    let head = &bytes[..bytes.len().min(MARKER_WINDOW)];
    if !contains(head, b"%PDF-") {
        return PdfCheck::MissingHeader;
    }

    let tail = &bytes[bytes.len().saturating_sub(MARKER_WINDOW)..];
    if !contains(tail, b"%%EOF") {
        return PdfCheck::MissingTrailer;
    }

    if !PAGE_OBJECT.is_match(bytes) {
        return PdfCheck::NoPages;
    }

    PdfCheck::Valid
}

/// Reads and checks one file
pub fn check_pdf_file(path: &Path) -> PdfCheck {
    match fs::read(path) {
        Ok(bytes) => check_pdf_bytes(&bytes),
        Err(e) => PdfCheck::Unreadable(e.to_string()),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// One file visited by [`verify_directory`]
#[derive(Debug, Clone)]
pub struct VerifiedFile {
    pub path: PathBuf,
    pub check: PdfCheck,
    /// The file was deleted because it failed the check
    pub removed: bool,
    /// The file name contains uppercase letters, which the downloader never produces
    pub has_uppercase: bool,
}

/// Summary of a verification pass
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub files: Vec<VerifiedFile>,
}

impl VerifyReport {
    pub fn valid_count(&self) -> usize {
        self.files.iter().filter(|f| f.check.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.files.len() - self.valid_count()
    }

    pub fn removed_count(&self) -> usize {
        self.files.iter().filter(|f| f.removed).count()
    }

    pub fn uppercase_names(&self) -> impl Iterator<Item = &VerifiedFile> {
        self.files.iter().filter(|f| f.has_uppercase)
    }
}

/// Checks every `.pdf` file directly under `dir`
///
/// # Arguments
///
/// * `dir` - The output directory to scan (not recursive)
/// * `remove_invalid` - Delete files that fail the structural check
///
/// # Returns
///
/// * `Ok(VerifyReport)` - Every matching file with its verdict, sorted by path
/// * `Err(VerifyError)` - The directory itself could not be listed
pub fn verify_directory(dir: &Path, remove_invalid: bool) -> Result<VerifyReport, VerifyError> {
    let entries = fs::read_dir(dir).map_err(|source| VerifyError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    paths.sort();

    let mut report = VerifyReport::default();

    for path in paths {
        let check = check_pdf_file(&path);
        let has_uppercase = path
            .file_name()
            .map(|name| name.to_string_lossy().chars().any(|c| c.is_uppercase()))
            .unwrap_or(false);

        if has_uppercase {
            tracing::warn!("Uppercase letters in file name: {}", path.display());
        }

        let mut removed = false;
        if !check.is_valid() {
            tracing::warn!("{} is corrupt or invalid: {}", path.display(), check.describe());
            if remove_invalid {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        tracing::info!("Removed invalid file {}", path.display());
                        removed = true;
                    }
                    Err(e) => tracing::error!("Failed to remove {}: {}", path.display(), e),
                }
            }
        }

        report.files.push(VerifiedFile {
            path,
            check,
            removed,
            has_uppercase,
        });
    }

    Ok(report)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Prints a verification report to stdout
pub fn print_verify_report(report: &VerifyReport) {
    println!("=== Document Verification ===\n");
    println!("  Files checked: {}", report.files.len());
    println!("  Valid: {}", report.valid_count());
    println!("  Invalid: {}", report.invalid_count());
    println!("  Removed: {}", report.removed_count());
    println!();

    let invalid: Vec<_> = report.files.iter().filter(|f| !f.check.is_valid()).collect();
    if !invalid.is_empty() {
        println!("Invalid Files:");
        for file in invalid {
            let suffix = if file.removed { " (removed)" } else { "" };
            println!(
                "  - {}: {}{}",
                file.path.display(),
                file.check.describe(),
                suffix
            );
        }
        println!();
    }

    let uppercase: Vec<_> = report.uppercase_names().collect();
    if !uppercase.is_empty() {
        println!("Uppercase File Names ({}):", uppercase.len());
        for file in uppercase {
            println!("  - {}", file.path.display());
        }
    }
}
