//! Integration tests: the controller against a mock conversion server.
//!
//! Each test mounts `/convert` on a `wiremock` server, runs one or more
//! attempts and checks what the UI surface saw, what landed in the download
//! directory, and that the controller ended idle.

use gemini_share_pdf::{
    AttemptResult, ClientConfig, ClientError, ConversionController, DirectoryTarget,
    DownloadTarget, Message, Phase, Tone, UiSurface, ValidationError, DOWNLOAD_STARTED_MESSAGE,
    NETWORK_ERROR_MESSAGE,
};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHARE_LINK: &str = "https://g.co/gemini/share/abc123";
const PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

// ── Test helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    messages: Vec<Message>,
    busy: Vec<bool>,
}

impl UiSurface for Recorder {
    fn show_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy.push(busy);
    }
}

struct FullDisk;

impl DownloadTarget for FullDisk {
    fn trigger_download(&mut self, _bytes: &[u8], filename: &str) -> Result<(), ClientError> {
        Err(ClientError::DownloadFailed {
            path: filename.into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"),
        })
    }
}

fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig::builder().base_url(base_url).build().unwrap()
}

fn controller(
    server: &MockServer,
    dir: &TempDir,
) -> ConversionController<Recorder, DirectoryTarget> {
    ConversionController::new(
        config_for(&server.uri()),
        Recorder::default(),
        DirectoryTarget::new(dir.path()),
    )
    .unwrap()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn pdf_response(disposition: Option<&str>) -> ResponseTemplate {
    let template = ResponseTemplate::new(200).set_body_raw(PDF.to_vec(), "application/pdf");
    match disposition {
        Some(value) => template.insert_header("Content-Disposition", value),
        None => template,
    }
}

fn assert_idle_after_one_network_phase(c: &ConversionController<Recorder, DirectoryTarget>) {
    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.ui().busy, vec![true, false]);
    assert_eq!(c.ui().messages.first(), Some(&Message::cleared()));
}

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_download_uses_quoted_filename() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "url": SHARE_LINK })))
        .respond_with(pdf_response(Some(r#"attachment; filename="chat.pdf""#)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert_eq!(
        result,
        AttemptResult::Downloaded {
            filename: "chat.pdf".into(),
            size: PDF.len(),
        }
    );
    assert_eq!(
        c.state().message,
        Message::new(DOWNLOAD_STARTED_MESSAGE, Tone::Success)
    );
    assert_idle_after_one_network_phase(&c);
    assert_eq!(files_in(dir.path()), vec!["chat.pdf"]);
    assert_eq!(std::fs::read(dir.path().join("chat.pdf")).unwrap(), PDF);
}

#[tokio::test]
async fn input_is_trimmed_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_json(json!({ "url": SHARE_LINK })))
        .respond_with(pdf_response(None))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let result = c.attempt_conversion(&format!("  {SHARE_LINK}\n")).await;
    assert!(result.is_success(), "got: {result:?}");
}

#[tokio::test]
async fn missing_disposition_uses_default_filename() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(pdf_response(None))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert!(matches!(result, AttemptResult::Downloaded { ref filename, .. } if filename == "gemini-chat.pdf"));
    assert_eq!(files_in(dir.path()), vec!["gemini-chat.pdf"]);
}

#[tokio::test]
async fn unquoted_server_filename_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(pdf_response(Some("attachment;filename=gemini-chat-abc123.pdf")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    c.attempt_conversion(SHARE_LINK).await;
    assert_eq!(files_in(dir.path()), vec!["gemini-chat-abc123.pdf"]);
}

#[tokio::test]
async fn hostile_filename_stays_inside_download_dir() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(pdf_response(Some(r#"attachment; filename="../../escape.pdf""#)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let downloads = dir.path().join("downloads");
    let mut c = ConversionController::new(
        config_for(&server.uri()),
        Recorder::default(),
        DirectoryTarget::new(&downloads),
    )
    .unwrap();

    assert!(c.attempt_conversion(SHARE_LINK).await.is_success());
    assert_eq!(files_in(&downloads), vec!["escape.pdf"]);
    assert_eq!(files_in(dir.path()), vec!["downloads"]);
}

// ── Server-reported errors ───────────────────────────────────────────────────

#[tokio::test]
async fn server_error_message_is_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "bad link" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert_eq!(
        result,
        AttemptResult::Failed {
            message: "Error: bad link".into()
        }
    );
    assert_eq!(c.state().message, Message::error("Error: bad link"));
    assert_idle_after_one_network_phase(&c);
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn json_error_without_field_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "status": "down" })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    c.attempt_conversion(SHARE_LINK).await;
    assert_eq!(
        c.state().message,
        Message::error("Error: Something went wrong.")
    );
    assert_eq!(c.state().phase, Phase::Idle);
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_network_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw("<h1>Bad Gateway</h1>", "text/html"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert!(!result.is_success());
    assert_eq!(c.state().message, Message::error(NETWORK_ERROR_MESSAGE));
    assert_idle_after_one_network_phase(&c);
}

// ── Transport failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_server_shows_network_message() {
    // Reserve a port, then release it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let dir = TempDir::new().unwrap();
    let mut c = ConversionController::new(
        config_for(&format!("http://127.0.0.1:{port}")),
        Recorder::default(),
        DirectoryTarget::new(dir.path()),
    )
    .unwrap();

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert_eq!(
        result,
        AttemptResult::Failed {
            message: NETWORK_ERROR_MESSAGE.into()
        }
    );
    assert_eq!(c.state().message.tone, Tone::Error);
    assert_idle_after_one_network_phase(&c);
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn configured_timeout_ends_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(pdf_response(None).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .request_timeout_secs(1)
        .build()
        .unwrap();
    let mut c =
        ConversionController::new(config, Recorder::default(), DirectoryTarget::new(dir.path()))
            .unwrap();

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert!(!result.is_success());
    assert_eq!(c.state().message, Message::error(NETWORK_ERROR_MESSAGE));
    assert_eq!(c.state().phase, Phase::Idle);
}

#[tokio::test]
async fn dropped_attempt_still_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(pdf_response(None).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let pending = tokio::time::timeout(
        Duration::from_millis(200),
        c.attempt_conversion(SHARE_LINK),
    )
    .await;

    assert!(pending.is_err(), "attempt should still be in flight");
    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.ui().busy, vec![true, false]);
    assert!(files_in(dir.path()).is_empty());
}

// ── Download target failures ─────────────────────────────────────────────────

#[tokio::test]
async fn failing_download_target_reports_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(pdf_response(Some(r#"attachment; filename="chat.pdf""#)))
        .mount(&server)
        .await;

    let mut c =
        ConversionController::new(config_for(&server.uri()), Recorder::default(), FullDisk)
            .unwrap();

    let result = c.attempt_conversion(SHARE_LINK).await;

    assert!(!result.is_success());
    assert_eq!(c.state().message.tone, Tone::Error);
    assert!(
        c.state().message.text.contains("Could not save"),
        "got: {}",
        c.state().message.text
    );
    assert_eq!(c.state().phase, Phase::Idle);
    assert_eq!(c.ui().busy, vec![true, false]);
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_input_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(pdf_response(None))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    for (input, expected) in [
        ("", ValidationError::EmptyInput),
        ("   ", ValidationError::EmptyInput),
        ("https://example.com/x", ValidationError::InvalidShareLink),
        ("g.co/gemini/share/abc", ValidationError::InvalidShareLink),
        ("http://g.co/gemini/share/abc", ValidationError::InvalidShareLink),
    ] {
        let result = c.attempt_conversion(input).await;
        assert_eq!(result, AttemptResult::Rejected(expected.clone()), "input {input:?}");
        assert_eq!(c.state().message, Message::error(expected.to_string()));
        assert_eq!(c.state().phase, Phase::Idle);
    }

    assert!(c.ui().busy.is_empty(), "validation must not go busy");
    assert!(files_in(dir.path()).is_empty());
}

// ── Sequential attempts ──────────────────────────────────────────────────────

#[tokio::test]
async fn sequential_attempts_do_not_interfere() {
    const BAD: &str = "https://g.co/gemini/share/missing";

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_json(json!({ "url": BAD })))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Could not find any chat content." })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_json(json!({ "url": SHARE_LINK })))
        .respond_with(pdf_response(Some("attachment;filename=gemini-chat-abc123.pdf")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut c = controller(&server, &dir);

    let first = c.attempt_conversion(BAD).await;
    assert!(!first.is_success());
    assert_eq!(
        c.state().message,
        Message::error("Error: Could not find any chat content.")
    );

    let second = c.attempt_conversion(SHARE_LINK).await;
    assert!(second.is_success());
    assert_eq!(c.state().message, Message::success(DOWNLOAD_STARTED_MESSAGE));

    // Each network phase starts by clearing the previous message.
    let (ui, _) = c.into_parts();
    assert_eq!(ui.busy, vec![true, false, true, false]);
    assert_eq!(
        ui.messages,
        vec![
            Message::cleared(),
            Message::error("Error: Could not find any chat content."),
            Message::cleared(),
            Message::success(DOWNLOAD_STARTED_MESSAGE),
        ]
    );
    assert_eq!(files_in(dir.path()), vec!["gemini-chat-abc123.pdf"]);
}

#[tokio::test]
async fn custom_endpoint_path_is_honoured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/convert"))
        .respond_with(pdf_response(None))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .endpoint_path("/api/v1/convert")
        .build()
        .unwrap();
    let mut c =
        ConversionController::new(config, Recorder::default(), DirectoryTarget::new(dir.path()))
            .unwrap();

    assert!(c.attempt_conversion(SHARE_LINK).await.is_success());
}
