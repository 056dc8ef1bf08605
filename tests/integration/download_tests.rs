//! Download gate tests against a mock document server

use pdf_gather::config::DownloadConfig;
use pdf_gather::crawler::Downloader;
use pdf_gather::state::{DownloadOutcome, FailureReason, SkipReason};
use pdf_gather::storage::OutputDirectory;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BODY: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Page >> endobj\n%%EOF\n";

fn setup() -> (TempDir, OutputDirectory, Downloader) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let output = OutputDirectory::new(tmp.path(), 0o755);
    let downloader =
        Downloader::new(&DownloadConfig::default()).expect("Failed to build downloader");
    (tmp, output, downloader)
}

#[tokio::test]
async fn test_successful_download_writes_file() {
    let mock_server = MockServer::start().await;
    let (tmp, output, _) = setup();
    let config = DownloadConfig {
        user_agent: "pdf-gather-test/1.0".to_string(),
        ..DownloadConfig::default()
    };
    let downloader = Downloader::new(&config).expect("Failed to build downloader");

    Mock::given(method("GET"))
        .and(path("/docs/Manual_V2.pdf"))
        .and(header("user-agent", "pdf-gather-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/docs/Manual_V2.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    assert_eq!(
        record.outcome,
        DownloadOutcome::Done {
            bytes: PDF_BODY.len() as u64
        }
    );
    assert_eq!(record.destination, tmp.path().join("manual_v2.pdf"));
    assert_eq!(std::fs::read(&record.destination).unwrap(), PDF_BODY);
}

#[tokio::test]
async fn test_octet_stream_is_accepted() {
    let mock_server = MockServer::start().await;
    let (tmp, output, downloader) = setup();

    Mock::given(method("GET"))
        .and(path("/sheet.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "binary/octet-stream"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/sheet.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    assert!(record.outcome.is_done());
    assert!(tmp.path().join("sheet.pdf").is_file());
}

#[tokio::test]
async fn test_html_response_is_rejected_by_content_type() {
    let mock_server = MockServer::start().await;
    let (tmp, output, downloader) = setup();

    Mock::given(method("GET"))
        .and(path("/challenge.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<html>checking your browser</html>".to_vec(), "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/challenge.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    match &record.outcome {
        DownloadOutcome::Failed(reason @ FailureReason::ContentType(ct)) => {
            assert!(ct.starts_with("text/html"));
            assert_eq!(reason.code(), "content_type");
        }
        other => panic!("expected content type failure, got {:?}", other),
    }
    assert!(!tmp.path().join("challenge.pdf").exists());
}

#[tokio::test]
async fn test_empty_body_writes_nothing() {
    let mock_server = MockServer::start().await;
    let (tmp, output, downloader) = setup();

    Mock::given(method("GET"))
        .and(path("/empty.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(Vec::<u8>::new(), "application/pdf"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/empty.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    assert_eq!(
        record.outcome,
        DownloadOutcome::Failed(FailureReason::EmptyBody)
    );
    assert!(!tmp.path().join("empty.pdf").exists());
}

#[tokio::test]
async fn test_non_200_status_fails() {
    let mock_server = MockServer::start().await;
    let (tmp, output, downloader) = setup();

    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    assert_eq!(
        record.outcome,
        DownloadOutcome::Failed(FailureReason::Status(404))
    );
    assert!(!tmp.path().join("gone.pdf").exists());
}

#[tokio::test]
async fn test_existing_file_is_not_requested_or_overwritten() {
    let mock_server = MockServer::start().await;
    let (tmp, output, downloader) = setup();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "application/pdf"))
        .expect(0)
        .mount(&mock_server)
        .await;

    std::fs::write(tmp.path().join("kept.pdf"), b"local copy").unwrap();

    let url = format!("{}/kept.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    assert_eq!(
        record.outcome,
        DownloadOutcome::Skipped(SkipReason::AlreadyExists)
    );
    assert_eq!(
        std::fs::read(tmp.path().join("kept.pdf")).unwrap(),
        b"local copy"
    );
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_failure() {
    let (tmp, output, downloader) = setup();

    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/offline.pdf", port);
    let record = downloader.download(&url, &output).await;

    match &record.outcome {
        DownloadOutcome::Failed(reason) => assert_eq!(reason.code(), "transport"),
        other => panic!("expected transport failure, got {:?}", other),
    }
    assert!(!tmp.path().join("offline.pdf").exists());
}

#[tokio::test]
async fn test_missing_output_directory_fails_at_file_create() {
    let mock_server = MockServer::start().await;
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let missing = tmp.path().join("nope");
    let output = OutputDirectory::new(&missing, 0o755);
    let downloader =
        Downloader::new(&DownloadConfig::default()).expect("Failed to build downloader");

    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BODY.to_vec(), "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/manual.pdf", mock_server.uri());
    let record = downloader.download(&url, &output).await;

    match &record.outcome {
        DownloadOutcome::Failed(reason @ FailureReason::FileCreate(_)) => {
            assert_eq!(reason.code(), "file_create");
        }
        other => panic!("expected file create failure, got {:?}", other),
    }
    assert!(!missing.exists());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unbuildable_request_fails_before_sending() {
    let (tmp, output, downloader) = setup();

    let record = downloader.download("https://<bad>.pdf", &output).await;

    match &record.outcome {
        DownloadOutcome::Failed(reason @ FailureReason::RequestBuild(_)) => {
            assert_eq!(reason.code(), "request_build");
        }
        other => panic!("expected request build failure, got {:?}", other),
    }
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}
