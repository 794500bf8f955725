use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{any, get};
use axum::Router;
use thiserror::Error;
use tower_http::services::ServeDir;

use facewatch_core::annotation::infrastructure::rectangle_annotator::RectangleAnnotator;
use facewatch_core::broadcast::group_registry::GroupRegistry;
use facewatch_core::detection::domain::face_classifier::DetectionError;
use facewatch_core::detection::image_detector::{ImageDetector, ProcessingError};
use facewatch_core::detection::infrastructure::model_resolver::{ModelResolveError, ModelResolver};
use facewatch_core::detection::infrastructure::rustface_classifier::RustfaceClassifier;
use facewatch_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use facewatch_core::imaging::infrastructure::image_file_writer::JpegFileWriter;
use facewatch_core::pipeline::media_url::MediaUrlBuilder;
use facewatch_core::pipeline::upload_pipeline::UploadPipeline;
use facewatch_core::shared::constants::{SEETA_MODEL_NAME, SEETA_MODEL_URL};
use facewatch_core::storage::infrastructure::file_system_blob_store::FileSystemBlobStore;
use facewatch_core::upload::infrastructure::magic_mime_sniffer::MagicMimeSniffer;
use facewatch_core::upload::upload_validator::UploadValidator;

use crate::config::ServerConfig;
use crate::handlers::{faces_socket, health, upload};
use crate::request_log::log_request;

/// Checked-in models, used before falling back to a download.
const BUNDLED_MODEL_DIR: &str = "models";

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Model(#[from] ModelResolveError),
    #[error(transparent)]
    Classifier(#[from] DetectionError),
    #[error(transparent)]
    Detector(#[from] ProcessingError),
}

/// Shared by every handler. The registry is the only mutable state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<UploadPipeline>,
    pub registry: Arc<GroupRegistry>,
}

impl AppState {
    /// `pipeline` must publish into `registry`.
    pub fn new(pipeline: UploadPipeline) -> Self {
        let registry = pipeline.registry().clone();
        Self {
            pipeline: Arc::new(pipeline),
            registry,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Wires the production pipeline. Blocks while the model is downloaded,
/// so call it before entering the async runtime.
pub fn build_pipeline(
    config: &ServerConfig,
    registry: Arc<GroupRegistry>,
) -> Result<UploadPipeline, StartupError> {
    let model_path = match &config.model_path {
        Some(path) => path.clone(),
        None => ModelResolver::with_default_cache(Some(PathBuf::from(BUNDLED_MODEL_DIR)))?
            .resolve(SEETA_MODEL_NAME, SEETA_MODEL_URL)?,
    };
    let classifier = RustfaceClassifier::from_file(&model_path)?;

    let detector = ImageDetector::new(
        &config.media_root,
        Box::new(classifier),
        config.detection_params(),
        Box::new(ImageFileReader::new()),
        Box::new(RectangleAnnotator::default()),
        Box::new(JpegFileWriter::new()),
    )?;

    Ok(UploadPipeline::new(
        UploadValidator::new(Box::new(MagicMimeSniffer::new())),
        Box::new(FileSystemBlobStore::new(config.media_root.clone())),
        detector,
        registry,
        MediaUrlBuilder::new(config.public_base_url.clone()),
    ))
}

pub fn build_router(state: AppState, media_root: &Path, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload/", any(upload::upload_image))
        .route("/faces", get(faces_socket::faces_socket))
        .route("/health", get(health::health))
        .nest_service("/media", ServeDir::new(media_root))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
