use std::path::Path;

use crate::imaging::domain::image_reader::ImageIoError;
use crate::shared::frame::Frame;

/// Encodes a frame and writes it to an image file.
pub trait ImageWriter: Send + Sync {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), ImageIoError>;
}
