use uuid::Uuid;

/// A file part received with an upload request.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Client-supplied filename. Only its extension is ever trusted, and only
    /// for naming the stored copy.
    pub declared_name: String,
    pub content: Vec<u8>,
}

/// Transport-neutral view of one upload call.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub method: String,
    pub file: Option<UploadedFile>,
}

impl UploadRequest {
    pub fn post(declared_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            method: "POST".to_string(),
            file: Some(UploadedFile {
                declared_name: declared_name.into(),
                content,
            }),
        }
    }
}

/// An upload whose bytes were sniffed as an image.
///
/// Only [`crate::upload::upload_validator::UploadValidator`] builds these,
/// so `detected_mime_type` always starts with `image/`.
#[derive(Clone, Debug)]
pub struct ValidatedUpload {
    pub content: Vec<u8>,
    pub detected_mime_type: String,
    pub generated_id: Uuid,
    pub stored_filename: String,
}
