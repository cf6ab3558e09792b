use crate::silhouette::{ShapeMetrics, LEAF_EXTRA_RATIO};
use crate::types::{pixel_size, Rect};

/// Margin, in points, added around the logo bounds before cropping.
pub const SCISSOR_MARGIN: f32 = 4.0;

/// Pixel-space crop rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    /// Fits the rectangle inside a `size` target, or `None` when nothing of
    /// it is left.
    pub fn clamped(self, size: (u32, u32)) -> Option<Self> {
        let (target_width, target_height) = size;
        if self.x >= target_width || self.y >= target_height {
            return None;
        }
        let width = self.width.min(target_width - self.x);
        let height = self.height.min(target_height - self.y);
        (width > 0 && height > 0).then_some(Self {
            x: self.x,
            y: self.y,
            width,
            height,
        })
    }
}

/// Crop rectangle covering the logo footprint, leaf included.
///
/// The result depends only on its arguments, so a renderer resized away and
/// back lands on the same rectangle as one built at that size.
pub fn logo_scissor(frame: Rect, content_scale: f32, shape: &ShapeMetrics) -> Option<ScissorRect> {
    let (pixel_width, pixel_height) = pixel_size(frame, content_scale);
    let scale = content_scale.max(0.0);

    let mut footprint = shape.bounds.inset(-SCISSOR_MARGIN, -SCISSOR_MARGIN);
    footprint.height += shape.max_dimension * LEAF_EXTRA_RATIO;

    let sx = ((footprint.min_x() * scale) as i64).max(0);
    let sy = (((frame.height - footprint.max_y()) * scale) as i64).max(0);
    let sw = ((footprint.width * scale) as i64).min(i64::from(pixel_width) - sx);
    let sh = ((footprint.height * scale) as i64).min(i64::from(pixel_height) - sy);
    if sw <= 0 || sh <= 0 {
        return None;
    }

    Some(ScissorRect {
        x: sx as u32,
        y: sy as u32,
        width: sw as u32,
        height: sh as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silhouette::LogoSilhouette;

    fn metrics(frame: Rect) -> ShapeMetrics {
        ShapeMetrics::capture(&LogoSilhouette::new(frame, 2.0))
    }

    #[test]
    fn covers_logo_and_leaf() {
        let frame = Rect::from_size(400.0, 300.0);
        let shape = metrics(frame);
        let rect = logo_scissor(frame, 1.0, &shape).expect("scissor");

        let leaf = shape.max_dimension * LEAF_EXTRA_RATIO;
        let expected_width = shape.bounds.width + 2.0 * SCISSOR_MARGIN;
        let expected_height = shape.bounds.height + 2.0 * SCISSOR_MARGIN + leaf;
        assert_eq!(rect.width, expected_width as u32);
        assert_eq!(rect.height, expected_height as u32);
        let top = frame.height - (shape.bounds.max_y() + SCISSOR_MARGIN + leaf);
        assert_eq!(rect.y, top as u32);
    }

    #[test]
    fn scales_with_content_scale() {
        let frame = Rect::from_size(400.0, 300.0);
        let shape = metrics(frame);
        let single = logo_scissor(frame, 1.0, &shape).expect("scissor");
        let double = logo_scissor(frame, 2.0, &shape).expect("scissor");
        assert!(double.width >= single.width * 2 - 1);
        assert!(double.height >= single.height * 2 - 1);
    }

    #[test]
    fn oversized_shape_is_clipped_to_target() {
        let frame = Rect::from_size(60.0, 40.0);
        let shape = metrics(frame);
        let rect = logo_scissor(frame, 1.0, &shape).expect("scissor");
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
        assert!(rect.width <= 60);
        assert!(rect.height <= 40);
    }

    #[test]
    fn shape_outside_frame_has_no_scissor() {
        let frame = Rect::from_size(100.0, 100.0);
        let shape = ShapeMetrics {
            bounds: Rect::new(500.0, 10.0, 20.0, 20.0),
            max_dimension: 20.0,
        };
        assert_eq!(logo_scissor(frame, 1.0, &shape), None);
    }

    #[test]
    fn clamping_drops_rectangles_past_the_edge() {
        let rect = ScissorRect {
            x: 10,
            y: 10,
            width: 50,
            height: 50,
        };
        assert_eq!(
            rect.clamped((40, 30)),
            Some(ScissorRect {
                x: 10,
                y: 10,
                width: 30,
                height: 20
            })
        );
        assert_eq!(rect.clamped((10, 100)), None);
    }
}
