//! Read-only view of the logo outline that backgrounds are drawn behind.

use crate::types::Rect;

/// Width of the untransformed logo body outline, in points.
pub const LOGO_BODY_WIDTH: f32 = 77.0;
/// Height of the untransformed logo body outline, in points.
pub const LOGO_BODY_HEIGHT: f32 = 70.49;
/// Extra height the leaf adds above the body, relative to the max dimension.
pub const LEAF_EXTRA_RATIO: f32 = 0.231;

/// Supplies the logo's footprint to the renderers.
pub trait Silhouette {
    /// Bounding box of the logo body in the host frame.
    fn bounding_box(&self) -> Rect;
    /// Largest side of the logo body.
    fn max_dimension(&self) -> f32;
}

/// Snapshot of a [`Silhouette`] taken on configure/resize.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeMetrics {
    pub bounds: Rect,
    pub max_dimension: f32,
}

impl ShapeMetrics {
    pub fn capture(shape: &dyn Silhouette) -> Self {
        Self {
            bounds: shape.bounding_box(),
            max_dimension: shape.max_dimension(),
        }
    }
}

impl Silhouette for ShapeMetrics {
    fn bounding_box(&self) -> Rect {
        self.bounds
    }

    fn max_dimension(&self) -> f32 {
        self.max_dimension
    }
}

/// The logo body scaled by `scale` and centred in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoSilhouette {
    frame: Rect,
    scale: f32,
}

impl LogoSilhouette {
    pub fn new(frame: Rect, scale: f32) -> Self {
        Self { frame, scale }
    }

    /// Re-centres the logo for a new host frame.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    fn body_size(&self) -> (f32, f32) {
        let scale = self.scale.max(0.0);
        (LOGO_BODY_WIDTH * scale, LOGO_BODY_HEIGHT * scale)
    }
}

impl Silhouette for LogoSilhouette {
    fn bounding_box(&self) -> Rect {
        let (width, height) = self.body_size();
        Rect::new(
            self.frame.mid_x() - width * 0.5,
            self.frame.mid_y() - height * 0.5,
            width,
            height,
        )
    }

    fn max_dimension(&self) -> f32 {
        let (width, height) = self.body_size();
        width.max(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_is_centred_in_frame() {
        let logo = LogoSilhouette::new(Rect::from_size(400.0, 300.0), 2.0);
        let bounds = logo.bounding_box();
        assert!((bounds.mid_x() - 200.0).abs() < 1e-4);
        assert!((bounds.mid_y() - 150.0).abs() < 1e-4);
        assert!((logo.max_dimension() - 154.0).abs() < 1e-4);
    }

    #[test]
    fn snapshot_matches_provider() {
        let logo = LogoSilhouette::new(Rect::from_size(800.0, 600.0), 1.5);
        let metrics = ShapeMetrics::capture(&logo);
        assert_eq!(metrics.bounds, logo.bounding_box());
        assert_eq!(metrics.max_dimension, logo.max_dimension());
    }
}
