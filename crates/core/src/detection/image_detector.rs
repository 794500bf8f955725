use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_classifier::{DetectionError, FaceClassifier};
use crate::imaging::domain::image_reader::{ImageIoError, ImageReader};
use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::PROCESSED_DIR;
use crate::shared::frame::Frame;

/// Underlying reason a [`ProcessingError`] was raised.
#[derive(Error, Debug)]
pub enum ProcessingCause {
    #[error("Failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: ImageIoError,
    },
    #[error(transparent)]
    Detection(#[from] DetectionError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: ImageIoError,
    },
    #[error("Failed to create {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure inside the detector. Callers react to it uniformly; the
/// cause is kept for operators.
#[derive(Error, Debug)]
#[error("Failed to process image: {cause}")]
pub struct ProcessingError {
    #[source]
    cause: ProcessingCause,
}

impl ProcessingError {
    pub fn cause(&self) -> &ProcessingCause {
        &self.cause
    }
}

impl From<ProcessingCause> for ProcessingError {
    fn from(cause: ProcessingCause) -> Self {
        Self { cause }
    }
}

impl From<DetectionError> for ProcessingError {
    fn from(e: DetectionError) -> Self {
        ProcessingCause::Detection(e).into()
    }
}

/// Annotated output of one processed upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedArtifact {
    /// Relative to the media root, e.g. `processed/faces_{id}.jpg`.
    pub output_path: PathBuf,
    pub face_count: usize,
}

/// Detect → annotate → write, for a single stored image.
pub struct ImageDetector {
    classifier: Box<dyn FaceClassifier>,
    params: DetectionParams,
    reader: Box<dyn ImageReader>,
    annotator: Box<dyn FrameAnnotator>,
    writer: Box<dyn ImageWriter>,
    processed_dir: PathBuf,
}

impl ImageDetector {
    /// Creates `<media_root>/processed` if missing.
    pub fn new(
        media_root: &Path,
        classifier: Box<dyn FaceClassifier>,
        params: DetectionParams,
        reader: Box<dyn ImageReader>,
        annotator: Box<dyn FrameAnnotator>,
        writer: Box<dyn ImageWriter>,
    ) -> Result<Self, ProcessingError> {
        let processed_dir = media_root.join(PROCESSED_DIR);
        fs::create_dir_all(&processed_dir).map_err(|source| ProcessingCause::OutputDir {
            path: processed_dir.clone(),
            source,
        })?;
        Ok(Self {
            classifier,
            params,
            reader,
            annotator,
            writer,
            processed_dir,
        })
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Face boxes in classifier order. Degenerate boxes are discarded.
    pub fn detect_faces(&self, frame: &Frame) -> Result<Vec<BoundingBox>, DetectionError> {
        let gray = frame.to_grayscale();
        let boxes = self.classifier.classify(&gray, &self.params)?;
        Ok(boxes.into_iter().filter(BoundingBox::is_valid).collect())
    }

    /// Writes `processed/faces_{id}.jpg`; the input file is left untouched.
    pub fn process_image(
        &self,
        image_path: &Path,
        id: &str,
    ) -> Result<ProcessedArtifact, ProcessingError> {
        let mut frame = self
            .reader
            .read(image_path)
            .map_err(|source| ProcessingCause::ImageLoad {
                path: image_path.to_path_buf(),
                source,
            })?;

        let faces = self.detect_faces(&frame)?;
        self.annotator.annotate(&mut frame, &faces);

        let output_filename = format!("faces_{id}.jpg");
        let full_output_path = self.processed_dir.join(&output_filename);
        self.writer
            .write(&full_output_path, &frame)
            .map_err(|source| ProcessingCause::Write {
                path: full_output_path.clone(),
                source,
            })?;

        log::info!(
            "Detected {} face(s) in {}, wrote {}",
            faces.len(),
            image_path.display(),
            full_output_path.display()
        );

        Ok(ProcessedArtifact {
            output_path: Path::new(PROCESSED_DIR).join(output_filename),
            face_count: faces.len(),
        })
    }
}
