use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Draws visual markers for detected faces onto a frame in place.
pub trait FrameAnnotator: Send + Sync {
    fn annotate(&self, frame: &mut Frame, boxes: &[BoundingBox]);
}
