use crate::shared::constants::{
    DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};

/// Precision/recall knobs for multi-scale sliding-window classifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Ratio between consecutive pyramid levels; must exceed 1.0.
    pub scale_factor: f64,
    pub min_neighbors: u32,
    /// Smallest reported face as (width, height).
    pub min_size: (u32, u32),
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: (DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_FACE_SIZE),
        }
    }
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(format!(
                "Scale factor must be greater than 1.0, got {}",
                self.scale_factor
            ));
        }
        if self.min_size.0 == 0 || self.min_size.1 == 0 {
            return Err(format!(
                "Minimum face size must be positive, got {}x{}",
                self.min_size.0, self.min_size.1
            ));
        }
        Ok(())
    }
}
