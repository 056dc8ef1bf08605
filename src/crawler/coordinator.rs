//! Gather coordinator - main orchestration logic
//!
//! One call to [`Coordinator::run`] performs a whole gather:
//! - Ensuring the output directory exists
//! - Rendering the listing page
//! - Extracting and deduplicating document links
//! - Validating each candidate
//! - Downloading each valid candidate in order
//!
//! Nothing that happens to a single candidate aborts the run.

use crate::config::Config;
use crate::crawler::fetcher::Downloader;
use crate::crawler::parser::{dedupe_preserving_order, extract_pdf_urls, extract_title};
use crate::crawler::renderer::{ChromeRenderer, PageRenderer};
use crate::output::RunStatistics;
use crate::storage::OutputDirectory;
use crate::url::validate_candidate;
use crate::GatherError;

/// Main gather coordinator structure
pub struct Coordinator<R: PageRenderer> {
    config: Config,
    renderer: R,
    downloader: Downloader,
    output: OutputDirectory,
}

impl Coordinator<ChromeRenderer> {
    /// Creates a coordinator that renders with a locally launched Chrome
    pub fn with_chrome(config: Config) -> Result<Self, GatherError> {
        let renderer = ChromeRenderer::new(config.browser.clone());
        Self::new(config, renderer)
    }
}

impl<R: PageRenderer> Coordinator<R> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `renderer` - Produces the rendered markup of the listing page
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(GatherError)` - The HTTP client could not be built
    pub fn new(config: Config, renderer: R) -> Result<Self, GatherError> {
        let downloader = Downloader::new(&config.download)?;
        let output = OutputDirectory::from_config(&config.output);

        Ok(Self {
            config,
            renderer,
            downloader,
            output,
        })
    }

    /// Runs one gather over the configured page
    pub async fn run(&self) -> RunStatistics {
        let page_url = self.config.target.page_url.as_str();
        let mut stats = RunStatistics::new(page_url);

        match self.output.ensure() {
            Ok(true) => tracing::info!("Created output directory {}", self.output.root().display()),
            Ok(false) => tracing::debug!(
                "Output directory {} already exists",
                self.output.root().display()
            ),
            // Each download will then fail at file creation
            Err(e) => tracing::error!(
                "Failed to create output directory {}: {}",
                self.output.root().display(),
                e
            ),
        }

        let markup = self.renderer.render(page_url).await;
        stats.markup_bytes = markup.len();

        stats.page_title = extract_title(&markup);
        match &stats.page_title {
            Some(title) => tracing::info!("Page title: {}", title),
            None => tracing::info!("Page title: (none)"),
        }

        let candidates = extract_pdf_urls(&markup);
        stats.candidates_found = candidates.len();

        let candidates = dedupe_preserving_order(candidates);
        stats.unique_candidates = candidates.len();

        tracing::info!(
            "Found {} PDF links ({} unique)",
            stats.candidates_found,
            stats.unique_candidates
        );

        for (index, candidate) in candidates.iter().enumerate() {
            tracing::debug!(
                "Processing {}/{}: {}",
                index + 1,
                stats.unique_candidates,
                candidate
            );

            if let Err(e) = validate_candidate(candidate) {
                tracing::warn!("Skipping invalid URL {}: {}", candidate, e);
                stats.record_rejection(candidate.as_str(), e);
                continue;
            }

            let record = self.downloader.download(candidate, &self.output).await;
            stats.record_download(record);
        }

        stats.finish();

        tracing::info!(
            "Gather completed: {} downloaded, {} skipped, {} failed, {} rejected",
            stats.downloaded(),
            stats.skipped(),
            stats.failed(),
            stats.rejected.len()
        );

        stats
    }
}

/// Runs a complete gather with Chrome rendering
///
/// # Example
///
/// ```no_run
/// use pdf_gather::config::Config;
/// use pdf_gather::crawler::run_gather;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_gather(Config::default()).await?;
/// println!("{} downloaded", stats.downloaded());
/// # Ok(())
/// # }
/// ```
pub async fn run_gather(config: Config) -> Result<RunStatistics, GatherError> {
    let coordinator = Coordinator::with_chrome(config)?;
    Ok(coordinator.run().await)
}
