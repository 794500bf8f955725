use serde::{Deserialize, Serialize};

use crate::shared::constants::CONNECTION_ESTABLISHED_MESSAGE;

/// Messages pushed to real-time clients, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    ConnectionEstablished {
        message: String,
    },
    FaceDetectionResult {
        image_url: String,
        faces_detected: usize,
    },
}

impl ServerEvent {
    pub fn connection_established() -> Self {
        ServerEvent::ConnectionEstablished {
            message: CONNECTION_ESTABLISHED_MESSAGE.to_string(),
        }
    }

    pub fn face_detection_result(image_url: impl Into<String>, faces_detected: usize) -> Self {
        ServerEvent::FaceDetectionResult {
            image_url: image_url.into(),
            faces_detected,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_connection_established_wire_format() {
        let text = ServerEvent::connection_established().to_json().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "connection_established",
                "message": "Connected to face detection service",
            })
        );
    }

    #[test]
    fn test_face_detection_result_wire_format() {
        let event = ServerEvent::face_detection_result("http://example.com/image.jpg", 3);
        let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "face_detection_result",
                "image_url": "http://example.com/image.jpg",
                "faces_detected": 3,
            })
        );
    }
}
