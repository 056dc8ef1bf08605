//! Configuration module for pdf-gather
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a built-in default, so running without a file is supported.
//!
//! # Example
//!
//! ```no_run
//! use pdf_gather::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gather.toml")).unwrap();
//! println!("Documents will be saved to: {}", config.output.directory.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, DownloadConfig, OutputConfig, TargetConfig, DEFAULT_PAGE_URL,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
