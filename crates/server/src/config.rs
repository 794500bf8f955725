use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use facewatch_core::detection::domain::detection_params::DetectionParams;
use facewatch_core::shared::constants::{
    DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0}")]
    Detection(String),
    #[error("Maximum upload size must be positive")]
    ZeroUploadLimit,
    #[error("Public base URL must start with http:// or https://, got {0}")]
    PublicBaseUrl(String),
}

/// Face detection upload and broadcast server.
#[derive(Parser, Debug, Clone)]
#[command(name = "facewatch", version)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "FACEWATCH_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Directory holding uploaded originals and annotated results.
    #[arg(long, env = "FACEWATCH_MEDIA_ROOT", default_value = "media")]
    pub media_root: PathBuf,

    /// SeetaFace model file. Downloaded into the user cache when omitted.
    #[arg(long, env = "FACEWATCH_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Base for returned image URLs, e.g. https://faces.example.com.
    /// Defaults to the scheme and host of each request.
    #[arg(long, env = "FACEWATCH_PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "FACEWATCH_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Image pyramid scale step (must be > 1.0).
    #[arg(long, env = "FACEWATCH_SCALE_FACTOR", default_value_t = DEFAULT_SCALE_FACTOR)]
    pub scale_factor: f64,

    /// Detection confidence; higher values report fewer faces.
    #[arg(long, env = "FACEWATCH_MIN_NEIGHBORS", default_value_t = DEFAULT_MIN_NEIGHBORS)]
    pub min_neighbors: u32,

    /// Smallest face side length in pixels.
    #[arg(long, env = "FACEWATCH_MIN_FACE_SIZE", default_value_t = DEFAULT_MIN_FACE_SIZE)]
    pub min_face_size: u32,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detection_params()
            .validate()
            .map_err(ConfigError::Detection)?;
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        if let Some(url) = &self.public_base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::PublicBaseUrl(url.clone()));
            }
        }
        Ok(())
    }

    pub fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            scale_factor: self.scale_factor,
            min_neighbors: self.min_neighbors,
            min_size: (self.min_face_size, self.min_face_size),
        }
    }
}
