//! pdf-gather: bulk retrieval of documents linked from a single page
//!
//! This crate renders a listing page in a controlled browser, extracts every
//! absolute PDF link from the rendered markup, and downloads each document
//! into a local directory, skipping files that are already present.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for pdf-gather operations
#[derive(Debug, Error)]
pub enum GatherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Report error: {0}")]
    Report(#[from] output::OutputError),

    #[error("Verification error: {0}")]
    Verify(#[from] storage::VerifyError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for pdf-gather operations
pub type Result<T> = std::result::Result<T, GatherError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, PageRenderer};
pub use state::{DownloadOutcome, DownloadState};
pub use url::{has_domain, is_url_valid, url_to_filename};
