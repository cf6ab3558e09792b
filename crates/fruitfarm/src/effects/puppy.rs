use bytemuck::{Pod, Zeroable};

use crate::background::{Effect, FrameContext, UniformWriter};
use crate::types::BackgroundEffect;

/// Copies of the logo drawn per frame.
pub const LAYER_COUNT: usize = 16;
/// Scale step between neighbouring copies.
pub const SCALE_RATIO: f32 = 1.28;
/// Scale of the innermost copy at zoom phase zero.
pub const BASE_SCALE: f32 = 0.06;
/// Zoom phase cycles per second.
const ZOOM_RATE: f32 = 0.25;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PuppyUniforms {
    resolution: [f32; 2],
    time: f32,
    _pad: f32,
}

/// Endless zoom through nested copies of the logo.
#[derive(Debug, Clone, Default)]
pub struct PuppyEffect {
    total_elapsed: f32,
}

impl PuppyEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    /// Fractional zoom phase in `[0, 1)`.
    pub fn zoom_phase(&self) -> f32 {
        (self.total_elapsed * ZOOM_RATE).fract()
    }

    /// Scale of copy `layer` at the current zoom phase.
    pub fn layer_scale(&self, layer: usize) -> f32 {
        BASE_SCALE * SCALE_RATIO.powf(layer as f32 + self.zoom_phase())
    }
}

impl Effect for PuppyEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Puppy
    }

    fn fragment_source(&self) -> &'static str {
        include_str!("shaders/puppy.glsl")
    }

    fn advance(&mut self, delta: f32) -> bool {
        if delta.is_finite() && delta > 0.0 {
            self.total_elapsed += delta;
        }
        false
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&PuppyUniforms {
            resolution: frame.resolution(),
            time: self.total_elapsed,
            _pad: 0.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_zoom_cycle_lines_up_with_the_next_layer() {
        let mut puppy = PuppyEffect::new();
        puppy.advance(2.0);
        let half_way = puppy.layer_scale(3);
        assert!((half_way - BASE_SCALE * SCALE_RATIO.powf(3.5)).abs() < 1e-5);
        puppy.advance(2.0);
        assert!(puppy.zoom_phase() < 1e-5);
        assert!((puppy.layer_scale(3) - BASE_SCALE * SCALE_RATIO.powi(3)).abs() < 1e-5);
    }

    #[test]
    fn outer_layers_exceed_the_drawable() {
        let puppy = PuppyEffect::new();
        assert!(puppy.layer_scale(LAYER_COUNT - 1) > 2.0);
        assert!(puppy.layer_scale(0) < 0.12);
    }
}
