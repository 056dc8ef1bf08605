//! Markdown run report
//!
//! Written after a run when `output.report-path` is configured, so the result
//! of an unattended run can be read without the logs.

use crate::output::stats::RunStatistics;
use crate::output::OutputResult;
use crate::state::DownloadOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for a run
///
/// # Arguments
///
/// * `stats` - The finished run statistics
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(stats: &RunStatistics, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_report(stats: &RunStatistics) -> String {
    let mut md = String::new();

    md.push_str("# PDF Gather Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Page**: {}\n", stats.page_url));
    if let Some(title) = &stats.page_title {
        md.push_str(&format!("- **Title**: {}\n", escape_cell(title)));
    }
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    md.push_str(&format!(
        "- **Rendered Markup**: {} bytes\n\n",
        stats.markup_bytes
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Candidates Found | {} |\n", stats.candidates_found));
    md.push_str(&format!("| Unique Candidates | {} |\n", stats.unique_candidates));
    md.push_str(&format!("| Rejected | {} |\n", stats.rejected.len()));
    md.push_str(&format!("| Downloaded | {} |\n", stats.downloaded()));
    md.push_str(&format!("| Skipped | {} |\n", stats.skipped()));
    md.push_str(&format!("| Failed | {} |\n", stats.failed()));
    md.push_str(&format!("| Bytes Written | {} |\n\n", stats.bytes_written()));

    if !stats.records.is_empty() {
        md.push_str("## Documents\n\n");
        md.push_str("| URL | File | Result |\n");
        md.push_str("|-----|------|--------|\n");
        for record in &stats.records {
            let result = match &record.outcome {
                DownloadOutcome::Done { bytes } => format!("downloaded ({} bytes)", bytes),
                DownloadOutcome::Skipped(reason) => format!("skipped: {}", reason),
                DownloadOutcome::Failed(reason) => format!("failed: {}", reason),
            };
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&record.url),
                escape_cell(&record.destination.display().to_string()),
                escape_cell(&result)
            ));
        }
        md.push('\n');
    }

    if !stats.rejected.is_empty() {
        md.push_str("## Rejected Candidates\n\n");
        for rejected in &stats.rejected {
            md.push_str(&format!("- `{}`: {}\n", rejected.url, rejected.reason));
        }
        md.push('\n');
    }

    md
}

/// Keeps table cells on one line and pipes from splitting columns
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
