use thiserror::Error;

use crate::detection::domain::detection_params::DetectionParams;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::GrayFrame;

#[derive(Error, Debug)]
#[error("Failed to detect faces: {0}")]
pub struct DetectionError(pub String);

/// Opaque face-localisation capability over single-channel images.
///
/// Boxes are returned in classifier order, which carries no meaning.
pub trait FaceClassifier: Send + Sync {
    fn classify(
        &self,
        gray: &GrayFrame,
        params: &DetectionParams,
    ) -> Result<Vec<BoundingBox>, DetectionError>;
}
