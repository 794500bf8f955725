/// Axis-aligned face rectangle in pixel coordinates, top-left origin.
///
/// Width and height are strictly positive for every box handed out by a
/// detector; classifiers that report degenerate boxes are filtered through
/// [`BoundingBox::is_valid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the box covers at least `min_width` x `min_height` pixels.
    pub fn covers(&self, min_width: u32, min_height: u32) -> bool {
        self.width as i64 >= min_width as i64 && self.height as i64 >= min_height as i64
    }
}
