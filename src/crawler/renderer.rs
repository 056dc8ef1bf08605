//! Page rendering through a controlled Chrome instance
//!
//! The listing page builds its download links with scripts and may sit behind
//! an anti-bot challenge, so the raw HTTP response is not enough. The page is
//! loaded in Chrome over CDP, given a fixed settle delay, and its full DOM is
//! serialized back to markup.

use crate::config::BrowserConfig;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a closing browser gets before it is killed
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Errors that can occur while rendering a page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to build browser config: {0}")]
    Config(String),

    #[error("Failed to create browser profile directory: {0}")]
    Profile(#[from] std::io::Error),

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] CdpError),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

/// Produces fully rendered markup for a page
///
/// Implementations never fail: any problem is logged and reported as empty
/// markup, which extracts to zero links.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    async fn render(&self, page_url: &str) -> String;
}

/// Renders pages with a freshly launched Chrome per call
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    config: BrowserConfig,
}

impl ChromeRenderer {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Renders in a throwaway profile that outlives the browser process
    async fn render_page(&self, page_url: &str) -> Result<String, RenderError> {
        let profile = tempfile::Builder::new()
            .prefix("pdf-gather-chrome-")
            .tempdir()?;
        self.render_in_profile(page_url, profile.path()).await
    }

    /// Launch, navigate, settle and serialize within the render timeout
    ///
    /// The browser is shut down before returning on every path, including
    /// timeouts, so the caller may remove `profile` right after.
    async fn render_in_profile(&self, page_url: &str, profile: &Path) -> Result<String, RenderError> {
        let deadline = Instant::now() + self.config.render_timeout();

        let mut session = with_timeout(
            BrowserSession::launch(&self.config, profile),
            remaining(deadline),
            "browser launch",
        )
        .await?;

        let result = with_timeout(
            session.capture(page_url, self.config.settle_delay()),
            remaining(deadline),
            "page render",
        )
        .await;

        session.shutdown().await;
        result
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

impl PageRenderer for ChromeRenderer {
    async fn render(&self, page_url: &str) -> String {
        tracing::info!("Scraping: {}", page_url);

        match self.render_page(page_url).await {
            Ok(html) => {
                tracing::info!("Rendered {} ({} bytes of markup)", page_url, html.len());
                html
            }
            Err(e) => {
                tracing::error!("Failed to render {}: {}", page_url, e);
                String::new()
            }
        }
    }
}

/// Runs `operation` with a deadline, mapping expiry to [`RenderError::Timeout`]
pub async fn with_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &'static str,
) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout {
            operation: operation_name,
            timeout,
        }),
    }
}

/// Builds the chromiumoxide launch configuration
fn build_cdp_config(config: &BrowserConfig, profile: &Path) -> Result<CdpBrowserConfig, RenderError> {
    let mut builder = CdpBrowserConfig::builder()
        .request_timeout(config.request_timeout())
        .window_size(config.window_width, config.window_height)
        .user_data_dir(profile)
        .arg("--disable-gpu")
        .arg("--no-first-run")
        .arg("--no-default-browser-check");

    if !config.headless {
        builder = builder.with_head();
    }

    if config.no_sandbox {
        builder = builder.no_sandbox().arg("--disable-setuid-sandbox");
    }

    if let Some(executable) = &config.chrome_executable {
        builder = builder.chrome_executable(executable);
    }

    builder.build().map_err(RenderError::Config)
}

/// A running Chrome and its CDP handler task
///
/// Dropping the session aborts the handler; chromiumoxide kills the process
/// on drop, but only [`BrowserSession::shutdown`] waits for it to exit.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: &BrowserConfig, profile: &Path) -> Result<Self, RenderError> {
        let cdp_config = build_cdp_config(config, profile)?;

        tracing::debug!("Launching browser (headless: {})", config.headless);
        let (browser, mut handler) = Browser::launch(cdp_config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {:?}", e);
                }
            }
        });

        Ok(Self { browser, handler })
    }

    async fn capture(&self, page_url: &str, settle_delay: Duration) -> Result<String, RenderError> {
        let page = self.browser.new_page(page_url).await?;
        page.wait_for_navigation().await?;

        tracing::debug!("Navigation finished, settling for {:?}", settle_delay);
        tokio::time::sleep(settle_delay).await;

        Ok(page.content().await?)
    }

    /// Closes Chrome and waits for the process to exit, killing it if it lingers
    async fn shutdown(&mut self) {
        let graceful = tokio::time::timeout(SHUTDOWN_GRACE, async {
            self.browser.close().await?;
            self.browser.wait().await?;
            Ok::<_, CdpError>(())
        })
        .await;

        match graceful {
            Ok(Ok(())) => return,
            Ok(Err(e)) => tracing::debug!("Browser close failed: {}", e),
            Err(_) => tracing::debug!("Browser did not exit within {:?}", SHUTDOWN_GRACE),
        }

        if let Some(Err(e)) = self.browser.kill().await {
            tracing::warn!("Failed to kill browser: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
