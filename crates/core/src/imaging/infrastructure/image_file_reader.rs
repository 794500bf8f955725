use std::path::Path;

use crate::imaging::domain::image_reader::{ImageIoError, ImageReader};
use crate::shared::frame::Frame;

/// Decodes any format supported by the `image` crate, guessing the format
/// from the file content rather than its extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, ImageIoError> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgb8();
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(format!("{} has zero dimensions", path.display()).into());
        }
        Ok(Frame::new(img.into_raw(), width, height))
    }
}
