//! Crawler module for page rendering and document retrieval
//!
//! This module contains the core gathering logic, including:
//! - Rendering the listing page in Chrome
//! - Extracting and deduplicating PDF links
//! - Downloading documents through a fixed set of gates
//! - Overall gather coordination

mod coordinator;
mod fetcher;
mod parser;
mod renderer;

pub use coordinator::{run_gather, Coordinator};
pub use fetcher::{build_http_client, Downloader};
pub use parser::{dedupe_preserving_order, extract_pdf_urls, extract_title};
pub use renderer::{with_timeout, ChromeRenderer, PageRenderer, RenderError};
