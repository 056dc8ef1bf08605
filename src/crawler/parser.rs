//! Rendered markup parsing
//!
//! Candidate document links are found by pattern over the raw markup rather
//! than by walking anchors, so a PDF URL is picked up wherever it appears:
//! `href` attributes, `data-*` attributes, inline scripts or plain text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Absolute http(s) URL ending in `.pdf`, without whitespace or quotes
static PDF_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s'"]+\.pdf"#).expect("PDF URL pattern is valid"));

/// Extracts every absolute PDF URL from rendered markup
///
/// Matches are returned in document order, duplicates included. The scheme
/// and the `.pdf` suffix are matched case-sensitively.
///
/// # Example
///
/// ```
/// use pdf_gather::crawler::extract_pdf_urls;
///
/// let html = r#"<a href="https://x.com/a.pdf">A</a> see https://x.com/b.pdf"#;
/// assert_eq!(
///     extract_pdf_urls(html),
///     vec!["https://x.com/a.pdf", "https://x.com/b.pdf"]
/// );
/// ```
pub fn extract_pdf_urls(markup: &str) -> Vec<String> {
    PDF_URL
        .find_iter(markup)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Removes duplicates while keeping the first occurrence of each string
pub fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Extracts the page title from rendered markup
///
/// Only used for reporting; it has no influence on which links are gathered.
pub fn extract_title(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
