use std::path::Path;

use uuid::Uuid;

use crate::shared::constants::UPLOAD_METHOD;
use crate::upload::domain::mime_sniffer::MimeSniffer;
use crate::upload::domain::upload_request::{UploadRequest, ValidatedUpload};
use crate::upload::domain::validation_error::ValidationError;

/// Checks method, presence and sniffed content type of an upload.
///
/// Reads nothing but the request; never touches the disk.
pub struct UploadValidator {
    sniffer: Box<dyn MimeSniffer>,
}

impl UploadValidator {
    pub fn new(sniffer: Box<dyn MimeSniffer>) -> Self {
        Self { sniffer }
    }

    pub fn validate(&self, request: UploadRequest) -> Result<ValidatedUpload, ValidationError> {
        if request.method != UPLOAD_METHOD {
            return Err(ValidationError::MethodNotAllowed);
        }

        let file = request.file.ok_or(ValidationError::MissingFile)?;

        let detected_type = self.sniffer.sniff(&file.content);
        if !detected_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage { detected_type });
        }

        // Fresh per call; identifiers are never shared between uploads.
        let generated_id = Uuid::new_v4();
        let stored_filename = stored_filename(&generated_id, &file.declared_name);

        Ok(ValidatedUpload {
            content: file.content,
            detected_mime_type: detected_type,
            generated_id,
            stored_filename,
        })
    }
}

/// `upload_{id}.{ext}`, keeping the declared extension when it is a plain
/// alphanumeric token.
fn stored_filename(id: &Uuid, declared_name: &str) -> String {
    let extension = Path::new(declared_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("upload_{id}.{ext}"),
        None => format!("upload_{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::domain::upload_request::UploadedFile;
    use crate::upload::infrastructure::magic_mime_sniffer::MagicMimeSniffer;
    use rstest::rstest;

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    struct FixedSniffer(&'static str);

    impl MimeSniffer for FixedSniffer {
        fn sniff(&self, _content: &[u8]) -> String {
            self.0.to_string()
        }
    }

    fn validator() -> UploadValidator {
        UploadValidator::new(Box::new(MagicMimeSniffer::new()))
    }

    #[rstest]
    #[case::get("GET")]
    #[case::put("PUT")]
    #[case::lowercase_post("post")]
    fn test_rejects_other_methods(#[case] method: &str) {
        let request = UploadRequest {
            method: method.to_string(),
            file: Some(UploadedFile {
                declared_name: "face.jpg".into(),
                content: JPEG_BYTES.to_vec(),
            }),
        };
        let err = validator().validate(request).unwrap_err();
        assert_eq!(err, ValidationError::MethodNotAllowed);
        assert_eq!(err.to_string(), "Only POST requests are allowed");
    }

    #[test]
    fn test_method_checked_before_file_presence() {
        let request = UploadRequest {
            method: "GET".into(),
            file: None,
        };
        assert_eq!(
            validator().validate(request).unwrap_err(),
            ValidationError::MethodNotAllowed
        );
    }

    #[test]
    fn test_rejects_missing_file() {
        let request = UploadRequest {
            method: "POST".into(),
            file: None,
        };
        let err = validator().validate(request).unwrap_err();
        assert_eq!(err, ValidationError::MissingFile);
        assert_eq!(err.to_string(), "No image file provided");
    }

    #[rstest]
    #[case::jpg_name("photo.jpg")]
    #[case::png_name("photo.png")]
    #[case::no_extension("photo")]
    fn test_rejects_text_regardless_of_name(#[case] name: &str) {
        let request = UploadRequest::post(name, b"definitely not pixels".to_vec());
        let err = validator().validate(request).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAnImage {
                detected_type: "text/plain".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "Uploaded file is not an image. Detected type: text/plain"
        );
    }

    #[test]
    fn test_accepts_image_bytes_with_misleading_name() {
        let request = UploadRequest::post("notes.txt", JPEG_BYTES.to_vec());
        let upload = validator().validate(request).unwrap();
        assert_eq!(upload.detected_mime_type, "image/jpeg");
        assert!(upload.stored_filename.ends_with(".txt"));
    }

    #[test]
    fn test_uses_injected_sniffer() {
        let validator = UploadValidator::new(Box::new(FixedSniffer("image/x-test")));
        let upload = validator
            .validate(UploadRequest::post("a.bin", vec![1, 2, 3]))
            .unwrap();
        assert_eq!(upload.detected_mime_type, "image/x-test");
        assert_eq!(upload.content, vec![1, 2, 3]);
    }

    #[test]
    fn test_stored_filename_derived_from_id_and_extension() {
        let upload = validator()
            .validate(UploadRequest::post("holiday.JPG", JPEG_BYTES.to_vec()))
            .unwrap();
        assert_eq!(
            upload.stored_filename,
            format!("upload_{}.JPG", upload.generated_id)
        );
    }

    #[test]
    fn test_generates_fresh_id_per_call() {
        let v = validator();
        let a = v
            .validate(UploadRequest::post("a.jpg", JPEG_BYTES.to_vec()))
            .unwrap();
        let b = v
            .validate(UploadRequest::post("a.jpg", JPEG_BYTES.to_vec()))
            .unwrap();
        assert_ne!(a.generated_id, b.generated_id);
        assert_ne!(a.stored_filename, b.stored_filename);
    }

    #[rstest]
    #[case::plain("face.jpeg", Some("jpeg"))]
    #[case::none("face", None)]
    #[case::dotfile(".hidden", None)]
    #[case::nested("dir/face.png", Some("png"))]
    #[case::odd_chars("face.j%g", None)]
    fn test_extension_handling(#[case] declared: &str, #[case] ext: Option<&str>) {
        let id = Uuid::new_v4();
        let name = stored_filename(&id, declared);
        match ext {
            Some(ext) => assert_eq!(name, format!("upload_{id}.{ext}")),
            None => assert_eq!(name, format!("upload_{id}")),
        }
    }
}
