use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::animation::ColorCycle;
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::palette::PALETTE_SIZE;
use crate::settings::CycleSettings;
use crate::types::BackgroundEffect;

use super::{gradient_colors, stop_locations};

/// Downward shift of the orbit centre, as a fraction of the frame height.
const CENTER_DROP: f32 = 0.021;
/// Orbit radius as a fraction of the logo's max dimension.
const ORBIT_RATIO: f32 = 0.75;
/// One orbit takes this many colour steps.
const STEPS_PER_ORBIT: f32 = 16.0;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct CircularGradientUniforms {
    resolution: [f32; 2],
    center: [f32; 2],
    radius: f32,
    stop_count: i32,
    _pad: [f32; 2],
}

/// Radial gradient whose centre orbits the logo.
#[derive(Debug, Clone)]
pub struct CircularGradientEffect {
    cycle: ColorCycle,
    total_elapsed: f32,
}

impl CircularGradientEffect {
    pub fn new(settings: CycleSettings) -> Self {
        Self {
            cycle: ColorCycle::new(settings.seconds_per_color),
            total_elapsed: 0.0,
        }
    }

    pub fn cycle(&self) -> &ColorCycle {
        &self.cycle
    }

    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    /// Orbit angle in radians, in `[0, 2π)`.
    pub fn orbit_angle(&self) -> f32 {
        let period = (self.cycle.seconds_per_color() * STEPS_PER_ORBIT).max(0.01);
        (self.total_elapsed / period).fract() * TAU
    }

    /// Gradient centre and radius in pixels.
    pub fn geometry(&self, frame: &FrameContext) -> ([f32; 2], f32) {
        let scale = frame.content_scale;
        let drop = frame.frame.height * CENTER_DROP;
        let orbit = frame.shape.max_dimension * ORBIT_RATIO;
        let angle = self.orbit_angle();
        let center = [
            (frame.frame.width * 0.5 + orbit * angle.cos()) * scale,
            (frame.frame.height * 0.5 - drop + orbit * angle.sin()) * scale,
        ];
        let radius = frame.frame.width.min(frame.frame.height) * 0.5 * scale;
        (center, radius)
    }
}

impl Effect for CircularGradientEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::CircularGradient
    }

    fn fragment_source(&self) -> &'static str {
        concat!(
            include_str!("shaders/gradient_lookup.glsl"),
            include_str!("shaders/circular_gradient.glsl")
        )
    }

    fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        self.total_elapsed += delta;
        self.cycle.advance(delta)
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        let (center, radius) = self.geometry(frame);
        out.push(&CircularGradientUniforms {
            resolution: frame.resolution(),
            center,
            radius,
            stop_count: PALETTE_SIZE as i32,
            _pad: [0.0; 2],
        })
        .push_slice(&gradient_colors(&self.cycle))
        .push_slice(&stop_locations());
    }
}
