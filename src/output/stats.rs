//! Run statistics
//!
//! Everything a run learned is tallied in memory and printed at the end;
//! nothing here is persisted except through the optional markdown report.

use crate::state::{DownloadOutcome, DownloadRecord};
use crate::UrlError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A candidate URL that failed validation
#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub url: String,
    pub reason: UrlError,
}

/// Statistics for a single gather run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// The rendered listing page
    pub page_url: String,

    /// Title of the rendered page, when it had one
    pub page_title: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Size of the rendered markup (0 when rendering failed)
    pub markup_bytes: usize,

    /// Pattern matches before deduplication
    pub candidates_found: usize,

    /// Distinct candidates after deduplication
    pub unique_candidates: usize,

    /// Candidates dropped by validation
    pub rejected: Vec<RejectedCandidate>,

    /// One record per attempted download, in processing order
    pub records: Vec<DownloadRecord>,
}

impl RunStatistics {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            page_title: None,
            started_at: Utc::now(),
            finished_at: None,
            markup_bytes: 0,
            candidates_found: 0,
            unique_candidates: 0,
            rejected: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn record_rejection(&mut self, url: impl Into<String>, reason: UrlError) {
        self.rejected.push(RejectedCandidate {
            url: url.into(),
            reason,
        });
    }

    pub fn record_download(&mut self, record: DownloadRecord) {
        self.records.push(record);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn downloaded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_done()).count()
    }

    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, DownloadOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, DownloadOutcome::Failed(_)))
            .count()
    }

    pub fn bytes_written(&self) -> u64 {
        self.records
            .iter()
            .map(|r| match r.outcome {
                DownloadOutcome::Done { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }

    /// Failure counts keyed by gate code
    pub fn failures_by_code(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            if let DownloadOutcome::Failed(reason) = &record.outcome {
                *counts.entry(reason.code()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Gather Statistics ===\n");

    println!("Page:");
    println!("  URL: {}", stats.page_url);
    if let Some(title) = &stats.page_title {
        println!("  Title: {}", title);
    }
    println!("  Rendered markup: {} bytes", stats.markup_bytes);
    println!();

    println!("Candidates:");
    println!("  Found: {}", stats.candidates_found);
    println!("  Unique: {}", stats.unique_candidates);
    println!("  Rejected: {}", stats.rejected.len());
    println!();

    println!("Downloads:");
    println!("  Downloaded: {}", stats.downloaded());
    println!("  Skipped (already present): {}", stats.skipped());
    println!("  Failed: {}", stats.failed());
    println!("  Bytes written: {}", stats.bytes_written());
    println!();

    let failures = stats.failures_by_code();
    if !failures.is_empty() {
        println!("Failure Summary:");
        for (code, count) in &failures {
            println!("  {}: {}", code, count);
        }
        println!();
    }

    if !stats.rejected.is_empty() {
        println!("Rejected Candidates ({}):", stats.rejected.len());
        for rejected in &stats.rejected {
            println!("  - {} ({})", rejected.url, rejected.reason);
        }
        println!();
    }

    if let Some(duration) = stats.duration_seconds() {
        println!("Finished in {} seconds", duration);
    }
}
