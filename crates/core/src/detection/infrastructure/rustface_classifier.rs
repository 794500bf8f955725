use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_classifier::{DetectionError, FaceClassifier};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::GrayFrame;

/// SeetaFace's base window; the engine rejects smaller minimum face sizes.
const MIN_WINDOW_SIZE: u32 = 20;
const SLIDE_WINDOW_STEP: u32 = 4;
/// Cascade score contributed per required neighbour. Yields the engine's
/// recommended threshold of 2.0 at the default of five neighbours.
const NEIGHBOR_SCORE_WEIGHT: f64 = 0.4;

/// Face classifier backed by the `rustface` crate (SeetaFace engine).
///
/// A funnel-structured cascade evaluated over sliding windows on an image
/// pyramid. The model is parsed once; each call builds a fresh detector
/// from a clone, so one instance can serve concurrent requests.
pub struct RustfaceClassifier {
    model: rustface::Model,
}

impl RustfaceClassifier {
    pub fn new(model: rustface::Model) -> Self {
        Self { model }
    }

    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_file(path: &Path) -> Result<Self, DetectionError> {
        let bytes = fs::read(path).map_err(|e| {
            DetectionError(format!("failed to read model {}: {e}", path.display()))
        })?;
        let model = rustface::read_model(Cursor::new(bytes)).map_err(|e| {
            DetectionError(format!("failed to parse model {}: {e}", path.display()))
        })?;
        log::info!("Loaded face model from {}", path.display());
        Ok(Self::new(model))
    }
}

impl FaceClassifier for RustfaceClassifier {
    fn classify(
        &self,
        gray: &GrayFrame,
        params: &DetectionParams,
    ) -> Result<Vec<BoundingBox>, DetectionError> {
        params.validate().map_err(DetectionError)?;

        let min_face_size = min_face_size(params);
        if gray.width() < min_face_size || gray.height() < min_face_size {
            return Ok(Vec::new());
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_face_size);
        detector.set_score_thresh(score_threshold(params));
        detector.set_pyramid_scale_factor(pyramid_scale(params));
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(
            gray.data(),
            gray.width(),
            gray.height(),
        ));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                BoundingBox::new(
                    bbox.x(),
                    bbox.y(),
                    bbox.width() as i32,
                    bbox.height() as i32,
                )
            })
            .filter(|b| b.covers(params.min_size.0, params.min_size.1))
            .collect())
    }
}

fn min_face_size(params: &DetectionParams) -> u32 {
    params.min_size.0.max(params.min_size.1).max(MIN_WINDOW_SIZE)
}

fn score_threshold(params: &DetectionParams) -> f64 {
    params.min_neighbors as f64 * NEIGHBOR_SCORE_WEIGHT
}

/// The engine shrinks the image by this factor per level.
fn pyramid_scale(params: &DetectionParams) -> f32 {
    ((1.0 / params.scale_factor) as f32).clamp(0.01, 0.99)
}
