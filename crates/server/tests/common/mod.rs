#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::{mpsc, oneshot};

use facewatch_core::annotation::infrastructure::rectangle_annotator::RectangleAnnotator;
use facewatch_core::broadcast::group_registry::GroupRegistry;
use facewatch_core::detection::domain::detection_params::DetectionParams;
use facewatch_core::detection::domain::face_classifier::{DetectionError, FaceClassifier};
use facewatch_core::detection::image_detector::ImageDetector;
use facewatch_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use facewatch_core::imaging::infrastructure::image_file_writer::JpegFileWriter;
use facewatch_core::pipeline::media_url::MediaUrlBuilder;
use facewatch_core::pipeline::upload_pipeline::UploadPipeline;
use facewatch_core::shared::bounding_box::BoundingBox;
use facewatch_core::shared::frame::GrayFrame;
use facewatch_core::storage::infrastructure::file_system_blob_store::FileSystemBlobStore;
use facewatch_core::upload::infrastructure::magic_mime_sniffer::MagicMimeSniffer;
use facewatch_core::upload::upload_validator::UploadValidator;
use facewatch_server::config::DEFAULT_MAX_UPLOAD_BYTES;
use facewatch_server::session::{InboundFrame, SessionTransport, TransportError};
use facewatch_server::{build_router, AppState};

pub const HOST: &str = "testserver";
const BOUNDARY: &str = "facewatch-test-boundary";
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// --- Stubs ---

/// Reports `faces` fixed boxes for any image.
pub struct StubClassifier {
    faces: usize,
}

impl FaceClassifier for StubClassifier {
    fn classify(
        &self,
        _gray: &GrayFrame,
        _params: &DetectionParams,
    ) -> Result<Vec<BoundingBox>, DetectionError> {
        Ok((0..self.faces as i32)
            .map(|i| BoundingBox::new(2 + i * 20, 2, 16, 16))
            .collect())
    }
}

/// In-memory transport; the test holds the peer side.
pub struct ChannelTransport {
    inbound: mpsc::UnboundedReceiver<InboundFrame>,
    outbound: mpsc::UnboundedSender<String>,
}

pub struct Peer {
    pub to_server: mpsc::UnboundedSender<InboundFrame>,
    pub from_server: mpsc::UnboundedReceiver<String>,
}

impl Peer {
    pub async fn next_json(&mut self) -> Value {
        let text = tokio::time::timeout(RECV_TIMEOUT, self.from_server.recv())
            .await
            .expect("timed out waiting for server message")
            .expect("session closed");
        serde_json::from_str(&text).unwrap()
    }
}

pub fn transport_pair() -> (ChannelTransport, Peer) {
    let (to_server, inbound) = mpsc::unbounded_channel();
    let (outbound, from_server) = mpsc::unbounded_channel();
    (
        ChannelTransport { inbound, outbound },
        Peer {
            to_server,
            from_server,
        },
    )
}

#[async_trait]
impl SessionTransport for ChannelTransport {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(text)
            .map_err(|e| TransportError(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<InboundFrame, TransportError>> {
        self.inbound.recv().await.map(Ok)
    }
}

/// Accepts the greeting, then never completes another send. The peer never
/// sends or closes.
pub struct StalledTransport {
    greeted: Option<oneshot::Sender<String>>,
}

impl StalledTransport {
    pub fn new() -> (Self, oneshot::Receiver<String>) {
        let (greeted, greeting) = oneshot::channel();
        (
            Self {
                greeted: Some(greeted),
            },
            greeting,
        )
    }
}

#[async_trait]
impl SessionTransport for StalledTransport {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        match self.greeted.take() {
            Some(greeted) => {
                let _ = greeted.send(text);
                Ok(())
            }
            None => std::future::pending().await,
        }
    }

    async fn recv(&mut self) -> Option<Result<InboundFrame, TransportError>> {
        std::future::pending().await
    }
}

// --- Helpers ---

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: TempDir,
}

impl TestApp {
    pub fn new(faces: usize) -> Self {
        Self::with_limit(faces, DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn with_limit(faces: usize, max_upload_bytes: usize) -> Self {
        let media = TempDir::new().unwrap();
        let detector = ImageDetector::new(
            media.path(),
            Box::new(StubClassifier { faces }),
            DetectionParams::default(),
            Box::new(ImageFileReader::new()),
            Box::new(RectangleAnnotator::default()),
            Box::new(JpegFileWriter::new()),
        )
        .unwrap();
        let pipeline = UploadPipeline::new(
            UploadValidator::new(Box::new(MagicMimeSniffer::new())),
            Box::new(FileSystemBlobStore::new(media.path())),
            detector,
            Arc::new(GroupRegistry::new()),
            MediaUrlBuilder::default(),
        );
        let state = AppState::new(pipeline);
        let router = build_router(state.clone(), media.path(), max_upload_bytes);
        Self {
            router,
            state,
            media,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([120, 120, 120]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Jpeg)
        .unwrap();
    bytes.into_inner()
}

pub fn multipart_upload(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload/")
        .header(header::HOST, HOST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
