use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Page scraped when no configuration overrides it
pub const DEFAULT_PAGE_URL: &str = "https://orqafpv.com/manual";

/// Browser-like User-Agent sent with every document request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Main configuration structure for pdf-gather
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target: TargetConfig,
    pub output: OutputConfig,
    pub browser: BrowserConfig,
    pub download: DownloadConfig,
}

/// The listing page to render
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// URL of the page whose PDF links are gathered
    #[serde(rename = "page-url")]
    pub page_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
        }
    }
}

/// Where downloaded documents and reports go
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives the downloaded files
    pub directory: PathBuf,

    /// Permission bits used when the directory has to be created (Unix only)
    #[serde(rename = "dir-mode")]
    pub dir_mode: u32,

    /// Optional path of a markdown report written after each run
    #[serde(rename = "report-path")]
    pub report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("PDFs"),
            dir_mode: 0o755,
            report_path: None,
        }
    }
}

/// Controlled browser settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run Chrome without a visible window
    pub headless: bool,

    #[serde(rename = "window-width")]
    pub window_width: u32,

    #[serde(rename = "window-height")]
    pub window_height: u32,

    /// Time to let scripts and anti-bot challenges settle after navigation (seconds)
    #[serde(rename = "settle-delay-secs")]
    pub settle_delay_secs: u64,

    /// Overall budget for launch, navigation, settling and extraction (seconds)
    #[serde(rename = "render-timeout-secs")]
    pub render_timeout_secs: u64,

    /// Timeout for individual CDP requests (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<PathBuf>,

    /// Pass `--no-sandbox` and `--disable-setuid-sandbox`
    #[serde(rename = "no-sandbox")]
    pub no_sandbox: bool,
}

impl BrowserConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: 1,
            window_height: 1,
            settle_delay_secs: 10,
            render_timeout_secs: 300,
            request_timeout_secs: 60,
            chrome_executable: None,
            no_sandbox: true,
        }
    }
}

/// Document download settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-download timeout (seconds); long on purpose for large files on slow servers
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Content-Type substrings accepted as a document response
    #[serde(rename = "accepted-content-types")]
    pub accepted_content_types: Vec<String>,
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 15 * 60,
            accepted_content_types: vec![
                "binary/octet-stream".to_string(),
                "application/pdf".to_string(),
            ],
        }
    }
}
