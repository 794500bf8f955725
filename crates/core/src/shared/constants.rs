pub const SEETA_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const SEETA_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Pyramid step between successive detection scales.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
/// Overlapping candidate windows required before a face is reported.
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
/// Smallest detectable face, in pixels per side.
pub const DEFAULT_MIN_FACE_SIZE: u32 = 30;

/// Annotation stroke colour (RGB green).
pub const ANNOTATION_COLOR: [u8; 3] = [0, 255, 0];
pub const ANNOTATION_THICKNESS: u32 = 2;

pub const UPLOADED_DIR: &str = "uploaded";
pub const PROCESSED_DIR: &str = "processed";
pub const MEDIA_URL_PREFIX: &str = "/media/";

pub const UPLOAD_METHOD: &str = "POST";
pub const UPLOAD_FIELD: &str = "image";

pub const FACES_TOPIC: &str = "faces";
pub const CONNECTION_ESTABLISHED_MESSAGE: &str = "Connected to face detection service";
