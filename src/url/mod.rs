//! URL handling module for pdf-gather
//!
//! This module provides candidate validation and the URL to filename
//! transform used to name downloaded documents.

mod sanitize;
mod validate;

// Re-export main functions
pub use sanitize::url_to_filename;
pub use validate::{has_domain, is_url_valid, validate_candidate};
