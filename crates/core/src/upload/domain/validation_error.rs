use thiserror::Error;

/// Client-caused upload rejections. Messages are surfaced verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Only POST requests are allowed")]
    MethodNotAllowed,
    #[error("No image file provided")]
    MissingFile,
    #[error("Uploaded file is not an image. Detected type: {detected_type}")]
    NotAnImage { detected_type: String },
}
