//! Local output directory handling
//!
//! Downloaded documents live directly under one output directory, named by
//! [`url_to_filename`]. Existence of that path is the only state kept between
//! runs.

use crate::config::OutputConfig;
use crate::url::url_to_filename;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The directory that receives downloaded documents
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    root: PathBuf,
    mode: u32,
}

impl OutputDirectory {
    pub fn new(root: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.directory.clone(), config.dir_mode)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory if it does not exist yet
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The directory was created
    /// * `Ok(false)` - The directory was already there
    /// * `Err(io::Error)` - Creation failed
    pub fn ensure(&self) -> io::Result<bool> {
        if directory_exists(&self.root) {
            return Ok(false);
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.mode);
        }
        builder.create(&self.root)?;

        Ok(true)
    }

    /// Full path a document downloaded from `url` is stored at
    pub fn destination_for(&self, url: &str) -> PathBuf {
        self.root.join(url_to_filename(url))
    }
}

/// Returns true if `path` names an existing directory
pub fn directory_exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Returns true if `path` names an existing entry that is not a directory
pub fn file_exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Removes a freshly created file when dropped, unless disarmed
///
/// Held between file creation and the end of the write so a failed write
/// never leaves a truncated document behind to be mistaken for a finished one.
#[derive(Debug)]
pub struct PartialFileGuard {
    path: Option<PathBuf>,
}

impl PartialFileGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Keeps the file; call once the write completed
    pub fn disarm(mut self) {
        self.path = None;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!("Removed partial file {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    "Failed to remove partial file {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}
