use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{ANNOTATION_COLOR, ANNOTATION_THICKNESS};
use crate::shared::frame::Frame;

/// Strokes a hollow rectangle around each box.
///
/// The outline spans `x..=x+width` by `y..=y+height` and grows inward by
/// `thickness` pixels. Parts outside the frame are clipped.
pub struct RectangleAnnotator {
    color: [u8; 3],
    thickness: u32,
}

impl RectangleAnnotator {
    pub fn new(color: [u8; 3], thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }

    fn draw(&self, frame: &mut Frame, bbox: &BoundingBox) {
        if !bbox.is_valid() {
            return;
        }
        let t = self.thickness as i64;
        let (left, top) = (bbox.x as i64, bbox.y as i64);
        let (right, bottom) = (bbox.right() as i64, bbox.bottom() as i64);

        let y_start = top.max(0);
        let y_end = bottom.min(frame.height() as i64 - 1);
        let x_start = left.max(0);
        let x_end = right.min(frame.width() as i64 - 1);
        if y_start > y_end || x_start > x_end {
            return;
        }

        for py in y_start..=y_end {
            let horizontal_edge = py < top + t || py > bottom - t;
            for px in x_start..=x_end {
                let vertical_edge = px < left + t || px > right - t;
                if horizontal_edge || vertical_edge {
                    frame.put_pixel(px as u32, py as u32, self.color);
                }
            }
        }
    }
}

impl Default for RectangleAnnotator {
    fn default() -> Self {
        Self::new(ANNOTATION_COLOR, ANNOTATION_THICKNESS)
    }
}

impl FrameAnnotator for RectangleAnnotator {
    fn annotate(&self, frame: &mut Frame, boxes: &[BoundingBox]) {
        for bbox in boxes {
            self.draw(frame, bbox);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 3] = [0, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];

    fn painted(frame: &Frame) -> usize {
        (0..frame.height())
            .flat_map(|y| (0..frame.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) == Some(GREEN))
            .count()
    }

    #[test]
    fn test_default_is_green_two_pixels() {
        let annotator = RectangleAnnotator::default();
        assert_eq!(annotator.color, GREEN);
        assert_eq!(annotator.thickness, 2);
    }

    #[test]
    fn test_draws_hollow_outline() {
        let mut frame = Frame::filled(40, 40, BLACK);
        RectangleAnnotator::default().annotate(&mut frame, &[BoundingBox::new(10, 10, 10, 10)]);

        // corners and stroke
        assert_eq!(frame.pixel(10, 10), Some(GREEN));
        assert_eq!(frame.pixel(20, 20), Some(GREEN));
        assert_eq!(frame.pixel(11, 15), Some(GREEN));
        assert_eq!(frame.pixel(19, 15), Some(GREEN));
        // interior untouched
        assert_eq!(frame.pixel(15, 15), Some(BLACK));
        assert_eq!(frame.pixel(12, 12), Some(BLACK));
        // outside untouched
        assert_eq!(frame.pixel(9, 9), Some(BLACK));
        assert_eq!(frame.pixel(21, 21), Some(BLACK));

        // 11x11 outline, 7x7 hole
        assert_eq!(painted(&frame), 11 * 11 - 7 * 7);
    }

    #[test]
    fn test_clips_at_frame_edges() {
        let mut frame = Frame::filled(10, 10, BLACK);
        RectangleAnnotator::default().annotate(&mut frame, &[BoundingBox::new(-5, -5, 10, 10)]);
        assert_eq!(frame.pixel(0, 4), Some(GREEN));
        assert_eq!(frame.pixel(5, 5), Some(GREEN));
        assert_eq!(frame.pixel(6, 6), Some(BLACK));
    }

    #[test]
    fn test_ignores_boxes_outside_frame_and_degenerate_boxes() {
        let mut frame = Frame::filled(10, 10, BLACK);
        RectangleAnnotator::default().annotate(
            &mut frame,
            &[BoundingBox::new(50, 50, 5, 5), BoundingBox::new(2, 2, 0, 4)],
        );
        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn test_no_boxes_leaves_frame_unchanged() {
        let mut frame = Frame::filled(8, 8, [1, 2, 3]);
        let before = frame.clone();
        RectangleAnnotator::default().annotate(&mut frame, &[]);
        assert_eq!(frame, before);
    }
}
