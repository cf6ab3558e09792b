use bytemuck::{Pod, Zeroable};

use crate::animation::ColorCycle;
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::palette::PALETTE_SIZE;
use crate::settings::CycleSettings;
use crate::types::BackgroundEffect;

use super::{gradient_colors, stop_locations};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct LinearGradientUniforms {
    resolution: [f32; 2],
    stop_count: i32,
    _pad: f32,
}

/// Vertical six-stop gradient whose stops rotate through the palette.
#[derive(Debug, Clone)]
pub struct LinearGradientEffect {
    cycle: ColorCycle,
}

impl LinearGradientEffect {
    pub fn new(settings: CycleSettings) -> Self {
        Self {
            cycle: ColorCycle::new(settings.seconds_per_color),
        }
    }

    pub fn cycle(&self) -> &ColorCycle {
        &self.cycle
    }
}

impl Effect for LinearGradientEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::LinearGradient
    }

    fn fragment_source(&self) -> &'static str {
        concat!(
            include_str!("shaders/gradient_lookup.glsl"),
            include_str!("shaders/linear_gradient.glsl")
        )
    }

    fn advance(&mut self, delta: f32) -> bool {
        self.cycle.advance(delta)
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&LinearGradientUniforms {
            resolution: frame.resolution(),
            stop_count: PALETTE_SIZE as i32,
            _pad: 0.0,
        })
        .push_slice(&gradient_colors(&self.cycle))
        .push_slice(&stop_locations());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silhouette::ShapeMetrics;
    use crate::types::{Rect, RendererParams};

    #[test]
    fn writes_three_uniform_blocks() {
        let effect = LinearGradientEffect::new(CycleSettings::new(2.0));
        let frame = FrameContext::new(
            RendererParams::new(Rect::from_size(200.0, 100.0), 2.0),
            ShapeMetrics::default(),
        );
        let mut out = UniformWriter::new();
        effect.write_uniforms(&frame, &mut out);
        let blobs = out.blobs();
        assert_eq!(blobs.len(), 3);
        assert_eq!(blobs[0].len(), 16);
        assert_eq!(blobs[1].len(), 16 * PALETTE_SIZE);
        assert_eq!(blobs[2].len(), 16 * PALETTE_SIZE);
        let resolution: &[f32] = bytemuck::cast_slice(&blobs[0][..8]);
        assert_eq!(resolution, &[400.0, 200.0]);
    }
}
