use std::path::Path;

use image::ImageFormat;

use crate::imaging::domain::image_reader::ImageIoError;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// Writes frames as JPEG files using the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegFileWriter;

impl JpegFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for JpegFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), ImageIoError> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save_with_format(path, ImageFormat::Jpeg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let frame = Frame::filled(100, 80, [50, 100, 200]);

        JpegFileWriter::new().write(&path, &frame).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 80);
    }

    #[test]
    fn test_solid_colour_survives_compression() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        JpegFileWriter::new()
            .write(&path, &Frame::filled(16, 16, [0, 255, 0]))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        let [r, g, b] = img.get_pixel(8, 8).0;
        assert!(r < 40 && g > 215 && b < 40, "got {r},{g},{b}");
    }

    #[test]
    fn test_write_into_missing_directory_errors() {
        let writer = JpegFileWriter::new();
        assert!(writer
            .write(Path::new("/nonexistent/dir/out.jpg"), &Frame::filled(4, 4, [0, 0, 0]))
            .is_err());
    }
}
