use bytemuck::{Pod, Zeroable};

use crate::background::{Effect, FrameContext, UniformWriter};
use crate::scissor::{logo_scissor, ScissorRect};
use crate::types::BackgroundEffect;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct OceanUniforms {
    resolution: [f32; 2],
    time: f32,
    _pad: f32,
}

/// Rolling deep-water waves with foam and spray on the crests.
#[derive(Debug, Clone, Default)]
pub struct OceanEffect {
    total_elapsed: f32,
}

impl OceanEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }
}

impl Effect for OceanEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Ocean
    }

    fn fragment_source(&self) -> &'static str {
        include_str!("shaders/ocean.glsl")
    }

    fn advance(&mut self, delta: f32) -> bool {
        if delta.is_finite() && delta > 0.0 {
            self.total_elapsed += delta;
        }
        false
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&OceanUniforms {
            resolution: frame.resolution(),
            time: self.total_elapsed,
            _pad: 0.0,
        });
    }

    fn scissor(&self, frame: &FrameContext) -> Option<ScissorRect> {
        logo_scissor(frame.frame, frame.content_scale, &frame.shape)
    }
}
