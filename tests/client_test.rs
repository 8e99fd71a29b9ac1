use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pointscan::client::{
    FileInput, ImageElement, LinkElement, PreviewHandler, SubmitEvent, TextElement, UploadHandler,
};

// ---- fake page elements ----

#[derive(Default)]
struct FakeInput(Mutex<Option<PathBuf>>);

impl FakeInput {
    fn with_file(path: PathBuf) -> Arc<Self> {
        Arc::new(Self(Mutex::new(Some(path))))
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl FileInput for FakeInput {
    fn selected(&self) -> Option<PathBuf> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FakeText(Mutex<String>);

impl FakeText {
    fn text(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

impl TextElement for FakeText {
    fn set_text(&self, text: &str) {
        *self.0.lock().unwrap() = text.to_string();
    }
}

#[derive(Default)]
struct FakeImage(Mutex<String>);

impl FakeImage {
    fn source(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

impl ImageElement for FakeImage {
    fn set_source(&self, url: &str) {
        *self.0.lock().unwrap() = url.to_string();
    }
}

#[derive(Default)]
struct FakeLink(Mutex<String>);

impl FakeLink {
    fn href(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

impl LinkElement for FakeLink {
    fn set_href(&self, href: &str) {
        *self.0.lock().unwrap() = href.to_string();
    }
}

fn temp_image(name: &str, content: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pointscan_client_{}_{}", uuid::Uuid::new_v4(), name));
    std::fs::write(&path, content).unwrap();
    path
}

// ---- preview handler ----

#[tokio::test]
async fn preview_shows_selected_file_as_data_url() {
    let file = temp_image("photo.png", b"\x89PNG\r\n\x1a\nrest");
    let input = FakeInput::with_file(file.clone());
    let image = Arc::new(FakeImage::default());

    let handler = PreviewHandler::new(input, image.clone());
    handler.file_selected().await;

    let source = image.source();
    assert!(
        source.starts_with("data:image/png;base64,"),
        "unexpected source: {}",
        source
    );

    let _ = std::fs::remove_file(file);
}

#[tokio::test]
async fn preview_with_no_selection_leaves_element_alone() {
    let image = Arc::new(FakeImage::default());
    let handler = PreviewHandler::new(FakeInput::empty(), image.clone());

    handler.file_selected().await;

    assert_eq!(image.source(), "");
}

#[tokio::test]
async fn preview_of_unreadable_file_leaves_element_alone() {
    let input = FakeInput::with_file(PathBuf::from("/nonexistent/photo.jpg"));
    let image = Arc::new(FakeImage::default());
    let handler = PreviewHandler::new(input, image.clone());

    handler.file_selected().await;

    assert_eq!(image.source(), "");
}

// ---- upload handler ----

struct UploadPage {
    handler: UploadHandler,
    results: Arc<FakeText>,
    download: Arc<FakeLink>,
}

fn upload_page(base_url: &str, input: Arc<FakeInput>) -> UploadPage {
    let results = Arc::new(FakeText::default());
    let download = Arc::new(FakeLink::default());
    let handler = UploadHandler::new(base_url, input, results.clone(), download.clone());
    UploadPage {
        handler,
        results,
        download,
    }
}

#[tokio::test]
async fn successful_upload_renders_pretty_json_and_download_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "text": "hello" },
            "csv": "out.csv"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = temp_image("ledger.png", b"fake png bytes");
    let page = upload_page(&server.uri(), FakeInput::with_file(file.clone()));

    let mut event = SubmitEvent::new();
    page.handler.submit(&mut event).await;

    assert!(event.default_prevented());
    // 2-space indentation, same as the page rendered before
    assert_eq!(page.results.text(), "{\n  \"text\": \"hello\"\n}");
    assert!(page.download.href().ends_with("/download/out.csv"));

    let _ = std::fs::remove_file(file);
}

#[tokio::test]
async fn server_error_is_shown_verbatim_and_link_is_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "bad image" })),
        )
        .mount(&server)
        .await;

    let file = temp_image("ledger.png", b"fake png bytes");
    let page = upload_page(&server.uri(), FakeInput::with_file(file.clone()));
    page.download.set_href("/download/previous.csv");

    let mut event = SubmitEvent::new();
    page.handler.submit(&mut event).await;

    assert!(event.default_prevented());
    assert_eq!(page.results.text(), "bad image");
    assert_eq!(page.download.href(), "/download/previous.csv");

    let _ = std::fs::remove_file(file);
}

#[tokio::test]
async fn submitting_without_a_file_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let page = upload_page(&server.uri(), FakeInput::empty());

    let mut event = SubmitEvent::new();
    page.handler.submit(&mut event).await;

    // Navigation is still suppressed, but nothing was sent or rendered
    assert!(event.default_prevented());
    assert_eq!(page.results.text(), "");
    assert_eq!(page.download.href(), "");
    server.verify().await;
}

#[tokio::test]
async fn connection_failure_gets_the_error_prefix() {
    // Port 1 is never listening; the request is refused at the transport layer
    let file = temp_image("ledger.png", b"fake png bytes");
    let page = upload_page("http://127.0.0.1:1", FakeInput::with_file(file.clone()));

    let mut event = SubmitEvent::new();
    page.handler.submit(&mut event).await;

    assert!(event.default_prevented());
    assert!(
        page.results.text().starts_with("Error: "),
        "unexpected results text: {}",
        page.results.text()
    );
    assert_eq!(page.download.href(), "");

    let _ = std::fs::remove_file(file);
}

#[tokio::test]
async fn invalid_json_response_gets_the_error_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let file = temp_image("ledger.png", b"fake png bytes");
    let page = upload_page(&server.uri(), FakeInput::with_file(file.clone()));

    let mut event = SubmitEvent::new();
    page.handler.submit(&mut event).await;

    assert!(page.results.text().starts_with("Error: "));

    let _ = std::fs::remove_file(file);
}

#[tokio::test]
async fn later_submission_overwrites_earlier_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [1, 2],
            "csv": "first.csv"
        })))
        .mount(&server)
        .await;

    let file = temp_image("ledger.png", b"fake png bytes");
    let page = upload_page(&server.uri(), FakeInput::with_file(file.clone()));

    page.handler.submit(&mut SubmitEvent::new()).await;
    let first = page.results.text();
    assert!(first.contains('1'));

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "engine down" })),
        )
        .mount(&server)
        .await;

    page.handler.submit(&mut SubmitEvent::new()).await;
    assert_eq!(page.results.text(), "engine down");
    // The link still points at the first upload's CSV
    assert!(page.download.href().ends_with("/download/first.csv"));

    let _ = std::fs::remove_file(file);
}
