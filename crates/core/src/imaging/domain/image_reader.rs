use std::path::Path;

use crate::shared::frame::Frame;

pub type ImageIoError = Box<dyn std::error::Error + Send + Sync>;

/// Decodes an image file into an RGB frame.
pub trait ImageReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<Frame, ImageIoError>;
}
