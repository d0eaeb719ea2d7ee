// SPDX-License-Identifier: MPL-2.0
//! End-to-end upload scenarios against a mock dehazing service.

use iced_dehaze::app::config::{self, Config};
use iced_dehaze::app::{self, App};
use iced_dehaze::application::port::{DehazeService, ServiceError, ServiceResponse};
use iced_dehaze::application::{Field, RequestId, ResultStore};
use iced_dehaze::domain::media::{Blob, MediaKind, ProcessingModel, SelectedFile, Variant};
use iced_dehaze::domain::upload::UploadRequest;
use iced_dehaze::i18n::I18n;
use iced_dehaze::infrastructure::{HttpClientConfig, HttpDehazeClient};
use iced_dehaze::media::read_selected_file;
use iced_dehaze::ui::uploader::{self, FileSource, Message, Phase, Preview};
use iced_dehaze::ui::viewer::{self, Content};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::mpsc;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// The application wired to a real HTTP client.
///
/// `App::update` hands network work back as an iced task, which only the
/// iced runtime can drive. The session sends the request the form just
/// queued through the same client and feeds the answer back in as the
/// message that task would have produced.
struct Session {
    app: App,
    client: Arc<HttpDehazeClient>,
}

impl Session {
    fn new(variant: Variant, server: &MockServer) -> Self {
        let client = Arc::new(
            HttpDehazeClient::new(HttpClientConfig::new(
                format!("{}/", server.uri()),
                Duration::from_secs(5),
            ))
            .expect("client should build"),
        );
        let mut config = Config::default();
        config.service.variant = variant;
        let service: Arc<dyn DehazeService> = client.clone();
        let app = App::with_service(
            config,
            I18n::new(Some("en-US".to_string()), None),
            Some(service),
        );
        Self { app, client }
    }

    fn send(&mut self, message: Message) {
        let _ = self.app.update(app::Message::Uploader(message));
    }

    fn select(&mut self, file: SelectedFile) {
        let _ = self.app.update(app::Message::FileRead {
            source: FileSource::DragDrop,
            result: Ok(file),
        });
    }

    /// Sends `message` and returns the request the form queued for it.
    fn queue(&mut self, message: Message) -> (RequestId, UploadRequest) {
        self.send(message);
        let uploader = self.app.uploader();
        let Phase::Pending { request_id } = uploader.phase() else {
            panic!("expected Pending, got {:?}", uploader.phase());
        };
        let request = uploader
            .last_request()
            .cloned()
            .expect("queued request should be kept");
        (*request_id, request)
    }

    fn finish(&mut self, request_id: RequestId, result: Result<ServiceResponse, ServiceError>) {
        self.send(Message::UploadFinished { request_id, result });
    }

    async fn round_trip(&mut self, message: Message) {
        let (request_id, request) = self.queue(message);
        let result = self.client.dehaze(request).await;
        self.finish(request_id, result);
    }

    fn result_bytes(&self) -> Option<Vec<u8>> {
        let url = self.app.store().url();
        self.app
            .registry()
            .resolve(&url)
            .map(|blob| blob.bytes().to_vec())
    }
}

fn png_bytes() -> Vec<u8> {
    let image = image_rs::RgbaImage::from_pixel(2, 2, image_rs::Rgba([120, 130, 140, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image_rs::ImageFormat::Png)
        .expect("png encoding should succeed");
    bytes
}

fn png_file(name: &str) -> SelectedFile {
    SelectedFile::new(name, Blob::new("image/png", vec![1, 2, 3]))
}

fn png_response(body: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "image/png")
        .set_body_bytes(body.to_vec())
}

/// Answers `first.png` slowly so it resolves after any later request.
struct FirstUploadIsSlow;

impl Respond for FirstUploadIsSlow {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body);
        if body.contains("filename=\"first.png\"") {
            png_response(b"first").set_delay(Duration::from_millis(300))
        } else {
            png_response(b"second")
        }
    }
}

#[tokio::test]
async fn disallowed_file_is_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new(Variant::Combined, &server);
    session.select(SelectedFile::new("anim.gif", Blob::new("image/gif", vec![1])));
    session.send(Message::TypeSelected(MediaKind::Image));
    session.send(Message::ModelSelected(ProcessingModel::Dcp));
    session.send(Message::Submit);

    let uploader = session.app.uploader();
    let issue = uploader
        .errors()
        .get(Field::File)
        .expect("file field should fail");
    assert_eq!(
        uploader::issue_text(&session.app.i18n, issue),
        "Only .jpg, .jpeg, .png, .mp4 and .webp formats are supported."
    );
    assert_eq!(uploader.phase(), &Phase::Idle);
    assert!(uploader.last_request().is_none());
}

#[tokio::test]
async fn haze_png_scenario_ends_with_image_in_viewer() {
    let server = MockServer::start().await;
    let dehazed = png_bytes();
    Mock::given(method("POST"))
        .and(body_string_contains("name=\"image\""))
        .and(body_string_contains("filename=\"haze.png\""))
        .respond_with(png_response(&dehazed))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("haze.png");
    std::fs::write(&path, png_bytes()).expect("write png");
    let file = read_selected_file(&path).expect("file should be readable");
    assert_eq!(file.mime(), "image/png");

    let mut session = Session::new(Variant::ImageOnly, &server);
    session.select(file);
    assert!(matches!(session.app.uploader().preview(), Preview::Decoding));

    session.round_trip(Message::Submit).await;
    assert_eq!(session.app.uploader().phase(), &Phase::Success);

    let url = session.app.store().url();
    assert!(!url.is_empty());
    assert_eq!(session.app.store().kind(), MediaKind::Image);
    assert_eq!(session.result_bytes(), Some(dehazed));
    assert_eq!(session.app.viewer().content(), &Content::Image { url });
}

#[tokio::test]
async fn mp4_with_ffa_scenario_ends_with_video_controls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("name=\"type\"\r\n\r\nvideo"))
        .and(body_string_contains("name=\"model\"\r\n\r\nffa"))
        .and(body_string_contains("filename=\"clip.mp4\""))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(b"processed-video".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(Variant::Combined, &server);
    session.select(SelectedFile::new(
        "clip.mp4",
        Blob::new("video/mp4", b"mp4-bytes".to_vec()),
    ));
    session.send(Message::TypeSelected(MediaKind::Video));
    session.send(Message::ModelSelected(ProcessingModel::Ffa));
    session.round_trip(Message::Submit).await;

    let url = session.app.store().url();
    assert_eq!(session.app.store().kind(), MediaKind::Video);
    assert!(matches!(
        session.app.viewer().content(),
        Content::Video { controls: true, url: shown } if *shown == url
    ));
    // The preview and the result each hold one object URL.
    assert_eq!(session.app.registry().live_count(), 2);
}

#[tokio::test]
async fn two_submits_issue_two_requests_and_only_latest_commits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(FirstUploadIsSlow)
        .expect(2)
        .mount(&server)
        .await;

    let mut session = Session::new(Variant::ImageOnly, &server);
    session.select(png_file("first.png"));
    let first = session.queue(Message::Submit);
    session.select(png_file("second.png"));
    let second = session.queue(Message::Submit);
    let (first_id, second_id) = (first.0, second.0);

    let (tx, mut rx) = mpsc::unbounded_channel();
    for (request_id, request) in [first, second] {
        let response = session.client.dehaze(request);
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send((request_id, response.await));
        });
    }
    drop(tx);

    let mut arrivals = Vec::new();
    while let Some((request_id, result)) = rx.recv().await {
        arrivals.push(request_id);
        session.finish(request_id, result);
    }

    // The earlier request resolved last and was discarded.
    assert_eq!(arrivals, vec![second_id, first_id]);
    assert_eq!(session.app.uploader().phase(), &Phase::Success);
    assert_eq!(session.result_bytes(), Some(b"second".to_vec()));
    assert_eq!(session.app.registry().live_count(), 1);
}

#[tokio::test]
async fn sequential_submits_leave_most_recent_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(png_response(b"first"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(png_response(b"second"))
        .mount(&server)
        .await;

    let mut session = Session::new(Variant::ImageOnly, &server);
    session.select(png_file("haze.png"));

    session.round_trip(Message::Submit).await;
    assert_eq!(session.result_bytes(), Some(b"first".to_vec()));
    session.round_trip(Message::Submit).await;

    assert_eq!(session.result_bytes(), Some(b"second".to_vec()));
    assert_eq!(session.app.registry().live_count(), 1);
}

#[tokio::test]
async fn server_error_enters_failed_and_retry_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(png_response(b"ok"))
        .mount(&server)
        .await;

    let mut session = Session::new(Variant::ImageOnly, &server);
    session.select(png_file("haze.png"));

    session.round_trip(Message::Submit).await;
    assert_eq!(
        session.app.uploader().phase(),
        &Phase::Failed {
            reason: ServiceError::Status(503)
        }
    );
    assert!(session.app.uploader().can_retry());
    assert!(session.app.store().is_empty());

    session.round_trip(Message::Retry).await;
    assert_eq!(session.app.uploader().phase(), &Phase::Success);
    assert_eq!(session.result_bytes(), Some(b"ok".to_vec()));
}

#[test]
fn empty_store_renders_no_result() {
    let store = ResultStore::new();
    let mut viewer = viewer::State::new();
    viewer.sync(&store.snapshot(), Variant::Combined);
    assert!(viewer.content().is_empty());

    let i18n = I18n::new(Some("en-US".into()), None);
    assert!(viewer::view(&viewer, viewer::ViewContext { i18n: &i18n }).is_none());
}

#[test]
fn language_is_read_from_saved_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut french = Config::default();
    french.general.language = Some("fr".to_string());
    config::save_to_path(&french, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    let i18n = I18n::new(None, loaded.general.language.as_deref());
    assert_eq!(i18n.current_locale().to_string(), "fr");
}
