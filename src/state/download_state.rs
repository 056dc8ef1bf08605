/// Download state definitions for tracking a single document transfer
///
/// A transfer walks `NotStarted → Requesting → Validating → Writing → Done`
/// and may leave early for `Skipped` or `Failed` at each gate.
use std::fmt;
use std::path::PathBuf;

/// Represents the current state of one document download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadState {
    // ===== Active States =====
    /// Nothing has been checked yet
    NotStarted,

    /// The GET request is being built and sent
    Requesting,

    /// Status, Content-Type and body are being checked
    Validating,

    /// The destination file is being created and filled
    Writing,

    // ===== Terminal States =====
    /// The document was written to disk
    Done,

    /// The destination already existed, nothing was fetched
    Skipped,

    /// A gate rejected the transfer
    Failed,
}

impl DownloadState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }

    /// Returns true if the transfer may still make progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if a transition to `next` is allowed
    ///
    /// Progress is strictly forward; every active state may exit to `Failed`,
    /// and only `NotStarted` may exit to `Skipped`.
    pub fn can_transition_to(&self, next: DownloadState) -> bool {
        use DownloadState::*;
        matches!(
            (self, next),
            (NotStarted, Requesting)
                | (NotStarted, Skipped)
                | (NotStarted, Failed)
                | (Requesting, Validating)
                | (Requesting, Failed)
                | (Validating, Writing)
                | (Validating, Failed)
                | (Writing, Done)
                | (Writing, Failed)
        )
    }

    /// Short stable label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Requesting => "requesting",
            Self::Validating => "validating",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible download states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::NotStarted,
            Self::Requesting,
            Self::Validating,
            Self::Writing,
            Self::Done,
            Self::Skipped,
            Self::Failed,
        ]
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a download was skipped without touching the network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A regular file already sits at the destination path
    AlreadyExists,
}

impl SkipReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "already_exists",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "file already exists"),
        }
    }
}

/// Which gate rejected a download, with the detail that was observed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The GET request could not be constructed
    RequestBuild(String),

    /// Connection, TLS, redirect or timeout error while sending
    Transport(String),

    /// The server answered with something other than 200
    Status(u16),

    /// The Content-Type did not name a document type
    ContentType(String),

    /// The body stream broke while being read
    BodyRead(String),

    /// The server sent a 200 with no bytes
    EmptyBody,

    /// The destination file could not be created
    FileCreate(String),

    /// The destination file could not be written
    FileWrite(String),
}

impl FailureReason {
    /// Stable classification code, one per gate
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequestBuild(_) => "request_build",
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::ContentType(_) => "content_type",
            Self::BodyRead(_) => "body_read",
            Self::EmptyBody => "empty_body",
            Self::FileCreate(_) => "file_create",
            Self::FileWrite(_) => "file_write",
        }
    }

    /// The state the transfer was in when this gate failed
    pub fn failed_in(&self) -> DownloadState {
        match self {
            Self::RequestBuild(_) | Self::Transport(_) => DownloadState::Requesting,
            Self::Status(_) | Self::ContentType(_) | Self::BodyRead(_) | Self::EmptyBody => {
                DownloadState::Validating
            }
            Self::FileCreate(_) | Self::FileWrite(_) => DownloadState::Writing,
        }
    }

    /// Returns all failure codes in gate order
    pub fn all_codes() -> [&'static str; 8] {
        [
            "request_build",
            "transport",
            "status",
            "content_type",
            "body_read",
            "empty_body",
            "file_create",
            "file_write",
        ]
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestBuild(e) => write!(f, "failed to build request: {}", e),
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Status(code) => write!(f, "unexpected HTTP status {}", code),
            Self::ContentType(ct) => write!(f, "invalid content type '{}' (expected PDF)", ct),
            Self::BodyRead(e) => write!(f, "failed to read body: {}", e),
            Self::EmptyBody => write!(f, "downloaded 0 bytes"),
            Self::FileCreate(e) => write!(f, "failed to create file: {}", e),
            Self::FileWrite(e) => write!(f, "failed to write file: {}", e),
        }
    }
}

/// Terminal result of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Done { bytes: u64 },
    Skipped(SkipReason),
    Failed(FailureReason),
}

impl DownloadOutcome {
    /// The terminal state this outcome corresponds to
    pub fn state(&self) -> DownloadState {
        match self {
            Self::Done { .. } => DownloadState::Done,
            Self::Skipped(_) => DownloadState::Skipped,
            Self::Failed(_) => DownloadState::Failed,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Source, destination and outcome of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    pub url: String,
    pub destination: PathBuf,
    pub outcome: DownloadOutcome,
}
