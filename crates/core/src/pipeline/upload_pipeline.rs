use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::broadcast::domain::server_event::ServerEvent;
use crate::broadcast::group_registry::GroupRegistry;
use crate::detection::image_detector::{ImageDetector, ProcessingError};
use crate::pipeline::media_url::{MediaUrlBuilder, RequestOrigin};
use crate::pipeline::upload_response::UploadResponse;
use crate::shared::constants::{FACES_TOPIC, UPLOADED_DIR};
use crate::storage::domain::blob_store::{BlobStore, StorageError};
use crate::upload::domain::upload_request::UploadRequest;
use crate::upload::domain::validation_error::ValidationError;
use crate::upload::upload_validator::UploadValidator;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl PipelineError {
    /// HTTP status this failure is reported with.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(ValidationError::MethodNotAllowed) => 405,
            Self::Validation(_) => 400,
            Self::Storage(StorageError::NotFound { .. }) => 404,
            Self::Storage(StorageError::InvalidPath(_)) => 400,
            Self::Storage(_) | Self::Processing(_) => 500,
        }
    }

    /// Client-facing message for the `error` field.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Storage(e @ StorageError::NotFound { .. }) => format!("File not found: {e}"),
            Self::Storage(e @ StorageError::InvalidPath(_)) => format!("Value error: {e}"),
            Self::Storage(e) => format!("An unexpected error occurred: {e}"),
            Self::Processing(e) => format!("An unexpected error occurred: {e}"),
        }
    }
}

/// Result of one fully processed upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSuccess {
    pub id: Uuid,
    pub image_url: String,
    pub faces_detected: usize,
}

/// Upload orchestration: validate → store → detect → publish.
///
/// Synchronous; callers on an async runtime run it on a blocking thread.
pub struct UploadPipeline {
    validator: UploadValidator,
    store: Box<dyn BlobStore>,
    detector: ImageDetector,
    registry: Arc<GroupRegistry>,
    urls: MediaUrlBuilder,
}

impl UploadPipeline {
    pub fn new(
        validator: UploadValidator,
        store: Box<dyn BlobStore>,
        detector: ImageDetector,
        registry: Arc<GroupRegistry>,
        urls: MediaUrlBuilder,
    ) -> Self {
        Self {
            validator,
            store,
            detector,
            registry,
            urls,
        }
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    /// Runs the whole pipeline. The detection event is published only
    /// after the annotated artifact has been written.
    pub fn process_upload(
        &self,
        request: UploadRequest,
        origin: &RequestOrigin,
    ) -> Result<UploadSuccess, PipelineError> {
        let upload = self.validator.validate(request)?;
        let id = upload.generated_id;

        let saved = self.store.save(
            &format!("{UPLOADED_DIR}/{}", upload.stored_filename),
            &upload.content,
        )?;
        log::info!(
            "Stored upload {id} ({}, {} bytes) at {}",
            upload.detected_mime_type,
            upload.content.len(),
            saved.display()
        );

        let artifact = self
            .detector
            .process_image(&self.store.resolve(&saved), &id.to_string())?;

        let image_url = self.urls.build(origin, &artifact.output_path);
        let report = self.registry.publish(
            FACES_TOPIC,
            &ServerEvent::face_detection_result(image_url.clone(), artifact.face_count),
        );
        log::info!(
            "Upload {id}: {} face(s), notified {} subscriber(s)",
            artifact.face_count,
            report.delivered
        );

        Ok(UploadSuccess {
            id,
            image_url,
            faces_detected: artifact.face_count,
        })
    }

    /// [`Self::process_upload`] collapsed into a status and JSON body.
    pub fn handle_upload(&self, request: UploadRequest, origin: &RequestOrigin) -> UploadResponse {
        match self.process_upload(request, origin) {
            Ok(success) => UploadResponse::success(success.image_url, success.faces_detected),
            Err(e) => {
                match &e {
                    PipelineError::Validation(v) => log::info!("Rejected upload: {v}"),
                    PipelineError::Processing(p) => {
                        log::error!("Upload processing failed: {p}");
                        log::debug!("Processing cause: {:?}", p.cause());
                    }
                    PipelineError::Storage(s) => log::error!("Upload storage failed: {s}"),
                }
                UploadResponse::error(e.status(), e.message())
            }
        }
    }
}
