//! Document downloader
//!
//! This module performs one GET per document URL and walks the response
//! through a fixed sequence of gates:
//! - Skip when the destination file already exists
//! - Build the request with a browser-like User-Agent
//! - Send it with a long overall timeout
//! - Require HTTP 200
//! - Require a document Content-Type
//! - Require a non-empty body
//! - Create and write the destination file
//!
//! Any gate failure ends the attempt; nothing is retried.

use crate::config::DownloadConfig;
use crate::state::{DownloadOutcome, DownloadRecord, DownloadState, FailureReason, SkipReason};
use crate::storage::{file_exists, OutputDirectory, PartialFileGuard};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Builds the HTTP client used for document downloads
///
/// The timeout covers the whole exchange including the body, and is long on
/// purpose: documents can be large and servers slow.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &DownloadConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads documents into an output directory
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    user_agent: String,
    accepted_content_types: Vec<String>,
}

impl Downloader {
    pub fn new(config: &DownloadConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    pub fn with_client(client: Client, config: &DownloadConfig) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            accepted_content_types: config.accepted_content_types.clone(),
        }
    }

    /// Returns true if a Content-Type header value names an accepted document type
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        self.accepted_content_types
            .iter()
            .any(|accepted| content_type.contains(accepted.as_str()))
    }

    /// Downloads one document into `output`
    ///
    /// Never returns an error: every way the attempt can end is captured in
    /// the record's outcome and logged here.
    pub async fn download(&self, url: &str, output: &OutputDirectory) -> DownloadRecord {
        let destination = output.destination_for(url);
        let outcome = self.run_gates(url, &destination).await;

        match &outcome {
            DownloadOutcome::Done { bytes } => tracing::info!(
                "Successfully downloaded {} bytes: {} → {}",
                bytes,
                url,
                destination.display()
            ),
            DownloadOutcome::Skipped(reason) => tracing::info!(
                "Skipping {} ({}): {}",
                url,
                reason,
                destination.display()
            ),
            DownloadOutcome::Failed(reason) => {
                tracing::warn!("Failed to download {}: {}", url, reason)
            }
        }

        DownloadRecord {
            url: url.to_string(),
            destination,
            outcome,
        }
    }

    async fn run_gates(&self, url: &str, destination: &Path) -> DownloadOutcome {
        let mut transfer = Transfer::new(url);

        if file_exists(destination) {
            transfer.advance(DownloadState::Skipped);
            return DownloadOutcome::Skipped(SkipReason::AlreadyExists);
        }

        transfer.advance(DownloadState::Requesting);

        let request = match self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .build()
        {
            Ok(request) => request,
            Err(e) => return transfer.fail(FailureReason::RequestBuild(e.to_string())),
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => return transfer.fail(FailureReason::Transport(describe_error(&e))),
        };

        transfer.advance(DownloadState::Validating);

        let status = response.status();
        if status != StatusCode::OK {
            return transfer.fail(FailureReason::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !self.accepts_content_type(&content_type) {
            return transfer.fail(FailureReason::ContentType(content_type));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return transfer.fail(FailureReason::BodyRead(describe_error(&e))),
        };

        if body.is_empty() {
            return transfer.fail(FailureReason::EmptyBody);
        }

        transfer.advance(DownloadState::Writing);

        let file = match tokio::fs::File::create(destination).await {
            Ok(file) => file,
            Err(e) => return transfer.fail(FailureReason::FileCreate(e.to_string())),
        };
        let guard = PartialFileGuard::new(destination);

        if let Err(e) = write_body(file, &body).await {
            drop(guard);
            return transfer.fail(FailureReason::FileWrite(e.to_string()));
        }
        guard.disarm();

        transfer.advance(DownloadState::Done);
        DownloadOutcome::Done {
            bytes: body.len() as u64,
        }
    }
}

/// Writes the whole body and closes the file before returning
async fn write_body(mut file: tokio::fs::File, body: &[u8]) -> std::io::Result<()> {
    file.write_all(body).await?;
    file.flush().await
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timeout ({})", e)
    } else if e.is_connect() {
        format!("connection failed ({})", e)
    } else {
        e.to_string()
    }
}

/// Tracks the state of one download through its gates
struct Transfer<'a> {
    url: &'a str,
    state: DownloadState,
}

impl<'a> Transfer<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            state: DownloadState::NotStarted,
        }
    }

    fn advance(&mut self, next: DownloadState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid download transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
    }

    fn fail(mut self, reason: FailureReason) -> DownloadOutcome {
        debug_assert_eq!(self.state, reason.failed_in());
        self.advance(DownloadState::Failed);
        DownloadOutcome::Failed(reason)
    }
}
