//! End-to-end gather tests
//!
//! The listing page is served by a fixed-markup renderer so no browser is
//! needed; documents come from a wiremock server.

use pdf_gather::config::{Config, OutputConfig, TargetConfig};
use pdf_gather::crawler::{Coordinator, PageRenderer};
use pdf_gather::output::{format_markdown_report, generate_markdown_report};
use pdf_gather::state::{DownloadOutcome, FailureReason};
use pdf_gather::storage::verify_directory;
use pdf_gather::UrlError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BODY: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Page >> endobj\ntrailer\n%%EOF\n";

/// Renderer returning the same markup for every page
struct StaticRenderer {
    markup: String,
}

impl PageRenderer for StaticRenderer {
    async fn render(&self, _page_url: &str) -> String {
        self.markup.clone()
    }
}

fn create_test_config(page_url: &str, output_dir: &Path) -> Config {
    Config {
        target: TargetConfig {
            page_url: page_url.to_string(),
        },
        output: OutputConfig {
            directory: output_dir.to_path_buf(),
            ..OutputConfig::default()
        },
        ..Config::default()
    }
}

fn listing_markup(base_url: &str) -> String {
    format!(
        r#"<html><head><title>Product Manuals</title></head><body>
        <a href="{base}/docs/Quick_Start.pdf">Quick start</a>
        <a href="{base}/docs/datasheet.pdf">Datasheet</a>
        <div data-file="{base}/docs/Quick_Start.pdf"></div>
        <a href="{base}/docs/protected.pdf">Protected</a>
        <a href="{base}/docs/removed.pdf">Removed</a>
        <p>Mirror: https://<mirror>.pdf</p>
        </body></html>"#,
        base = base_url
    )
}

async fn mount_documents(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/docs/Quick_Start.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "application/pdf"))
        .expect(1)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/datasheet.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "binary/octet-stream"),
        )
        .expect(1)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/protected.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"<html>challenge</html>".to_vec(), "text/html"),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/removed.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_full_gather_single_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_documents(&mock_server).await;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let output_dir = tmp.path().join("PDFs");
    let config = create_test_config(&format!("{}/manuals", base_url), &output_dir);
    let renderer = StaticRenderer {
        markup: listing_markup(&base_url),
    };

    let coordinator = Coordinator::new(config, renderer).expect("Failed to create coordinator");
    let stats = coordinator.run().await;

    assert_eq!(stats.page_title.as_deref(), Some("Product Manuals"));
    assert_eq!(stats.candidates_found, 6);
    assert_eq!(stats.unique_candidates, 5);

    assert_eq!(stats.rejected.len(), 1);
    assert_eq!(stats.rejected[0].url, "https://<mirror>.pdf");
    assert!(matches!(stats.rejected[0].reason, UrlError::Malformed(_)));

    assert_eq!(stats.downloaded(), 2);
    assert_eq!(stats.skipped(), 0);
    assert_eq!(stats.failed(), 2);
    assert_eq!(stats.bytes_written(), 2 * PDF_BODY.len() as u64);

    let failures = stats.failures_by_code();
    assert_eq!(failures.get("content_type"), Some(&1));
    assert_eq!(failures.get("status"), Some(&1));

    // Records follow first-occurrence order of the valid candidates
    let urls: Vec<&str> = stats.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/docs/Quick_Start.pdf", base_url),
            format!("{}/docs/datasheet.pdf", base_url),
            format!("{}/docs/protected.pdf", base_url),
            format!("{}/docs/removed.pdf", base_url),
        ]
    );

    assert!(output_dir.join("quick_start.pdf").is_file());
    assert!(output_dir.join("datasheet.pdf").is_file());
    assert!(!output_dir.join("protected.pdf").exists());
    assert!(!output_dir.join("removed.pdf").exists());

    // Everything that landed passes the structural check
    let report = verify_directory(&output_dir, false).expect("Failed to verify");
    assert_eq!(report.valid_count(), 2);
    assert_eq!(report.invalid_count(), 0);
}

#[tokio::test]
async fn test_second_run_skips_existing_documents() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    // Each document mock expects exactly one request across both runs
    mount_documents(&mock_server).await;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let output_dir = tmp.path().join("PDFs");
    let config = create_test_config(&format!("{}/manuals", base_url), &output_dir);
    let renderer = StaticRenderer {
        markup: listing_markup(&base_url),
    };
    let coordinator = Coordinator::new(config, renderer).expect("Failed to create coordinator");

    let first = coordinator.run().await;
    assert_eq!(first.downloaded(), 2);

    let original = std::fs::read(output_dir.join("quick_start.pdf")).unwrap();

    let second = coordinator.run().await;
    assert_eq!(second.downloaded(), 0);
    assert_eq!(second.skipped(), 2);
    // Failed documents are retried on every run
    assert_eq!(second.failed(), 2);

    assert_eq!(
        std::fs::read(output_dir.join("quick_start.pdf")).unwrap(),
        original
    );
}

#[tokio::test]
async fn test_render_failure_gathers_nothing() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let output_dir = tmp.path().join("nested").join("PDFs");
    let config = create_test_config("https://example.com/manuals", &output_dir);
    let renderer = StaticRenderer {
        markup: String::new(),
    };

    let coordinator = Coordinator::new(config, renderer).expect("Failed to create coordinator");
    let stats = coordinator.run().await;

    assert_eq!(stats.page_title, None);
    assert_eq!(stats.candidates_found, 0);
    assert!(stats.records.is_empty());
    assert!(output_dir.is_dir());
}

#[tokio::test]
async fn test_output_path_taken_by_a_file_fails_each_download() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for doc in ["/docs/one.pdf", "/docs/two.pdf"] {
        Mock::given(method("GET"))
            .and(path(doc))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "application/pdf"),
            )
            .mount(&mock_server)
            .await;
    }

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let blocker = tmp.path().join("PDFs");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let config = create_test_config(&format!("{}/manuals", base_url), &blocker);
    let renderer = StaticRenderer {
        markup: format!(
            r#"<a href="{base}/docs/one.pdf">1</a> <a href="{base}/docs/two.pdf">2</a>"#,
            base = base_url
        ),
    };

    let coordinator = Coordinator::new(config, renderer).expect("Failed to create coordinator");
    let stats = coordinator.run().await;

    // Directory creation failed but the run still visited every candidate
    assert!(stats.finished_at.is_some());
    assert_eq!(stats.records.len(), 2);
    for record in &stats.records {
        assert!(
            matches!(
                record.outcome,
                DownloadOutcome::Failed(FailureReason::FileCreate(_))
            ),
            "unexpected outcome for {}: {:?}",
            record.url,
            record.outcome
        );
    }
    assert_eq!(std::fs::read(&blocker).unwrap(), b"not a directory");
}

#[tokio::test]
async fn test_report_written_after_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_documents(&mock_server).await;

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let output_dir = tmp.path().join("PDFs");
    let report_path = tmp.path().join("report.md");
    let config = create_test_config(&format!("{}/manuals", base_url), &output_dir);
    let renderer = StaticRenderer {
        markup: listing_markup(&base_url),
    };

    let coordinator = Coordinator::new(config, renderer).expect("Failed to create coordinator");
    let stats = coordinator.run().await;

    generate_markdown_report(&stats, &report_path).expect("Failed to write report");

    let written = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(written, format_markdown_report(&stats));
    assert!(written.contains("- **Title**: Product Manuals"));
    assert!(written.contains("| Downloaded | 2 |"));
    assert!(written.contains("## Rejected Candidates"));
}
