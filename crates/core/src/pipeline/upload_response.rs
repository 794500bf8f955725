use serde::Serialize;

/// JSON body of an upload reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UploadResponseBody {
    Success {
        success: bool,
        image_url: String,
        faces_detected: usize,
    },
    Error {
        error: String,
    },
}

/// Transport-neutral reply: an HTTP status code and its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    pub body: UploadResponseBody,
}

impl UploadResponse {
    pub fn success(image_url: impl Into<String>, faces_detected: usize) -> Self {
        Self {
            status: 200,
            body: UploadResponseBody::Success {
                success: true,
                image_url: image_url.into(),
                faces_detected,
            },
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: UploadResponseBody::Error {
                error: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
