use bytemuck::{Pod, Zeroable};

use crate::animation::ColorCycle;
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::palette::PALETTE_SIZE;
use crate::settings::CycleSettings;
use crate::types::BackgroundEffect;

/// Hue turns per second of accumulated time.
const HUE_DRIFT: f32 = 0.02;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct LiquidUniforms {
    resolution: [f32; 2],
    time: f32,
    color_phase: f32,
    palette_phase: f32,
    _pad: [f32; 3],
}

/// Domain-warped plasma with contour rings that follow the logo outline.
#[derive(Debug, Clone)]
pub struct LiquidEffect {
    cycle: ColorCycle,
    total_elapsed: f32,
    color_phase: f32,
}

impl LiquidEffect {
    pub fn new(settings: CycleSettings) -> Self {
        Self {
            cycle: ColorCycle::new(settings.seconds_per_color),
            total_elapsed: 0.0,
            color_phase: 0.0,
        }
    }

    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    pub fn color_phase(&self) -> f32 {
        self.color_phase
    }

    /// Position on the palette ring as a fraction of a full turn.
    pub fn palette_phase(&self) -> f32 {
        (self.cycle.color_index() as f32 + self.cycle.progress()) / PALETTE_SIZE as f32
    }
}

impl Effect for LiquidEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Liquid
    }

    fn fragment_source(&self) -> &'static str {
        concat!(
            include_str!("shaders/flow_field.glsl"),
            include_str!("shaders/liquid.glsl")
        )
    }

    fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        self.total_elapsed += delta;
        self.color_phase = (self.total_elapsed * HUE_DRIFT).fract();
        self.cycle.advance(delta)
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&LiquidUniforms {
            resolution: frame.resolution(),
            time: self.total_elapsed,
            color_phase: self.color_phase,
            palette_phase: self.palette_phase(),
            _pad: [0.0; 3],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{Background, EffectRenderer};
    use crate::silhouette::LogoSilhouette;
    use crate::types::{Rect, RendererParams};

    #[test]
    fn colour_phase_wraps_every_fifty_seconds() {
        let mut liquid = LiquidEffect::new(CycleSettings::new(10.0));
        liquid.advance(25.0);
        assert!((liquid.color_phase() - 0.5).abs() < 1e-5);
        liquid.advance(37.5);
        assert!((liquid.color_phase() - 0.25).abs() < 1e-4);
        assert!((liquid.total_elapsed() - 62.5).abs() < 1e-4);
    }

    #[test]
    fn palette_phase_tracks_the_cycle() {
        let mut liquid = LiquidEffect::new(CycleSettings::new(10.0));
        liquid.advance(15.0);
        assert!((liquid.palette_phase() - 1.5 / 6.0).abs() < 1e-5);
    }

    #[test]
    fn palette_step_is_a_discrete_event() {
        let mut liquid = LiquidEffect::new(CycleSettings::new(1.0));
        assert!(!liquid.advance(0.6));
        assert!(liquid.advance(0.6));
    }

    #[test]
    fn palette_step_redraws_despite_the_throttle() {
        let frame = Rect::from_size(100.0, 50.0);
        let mut renderer = EffectRenderer::new(
            LiquidEffect::new(CycleSettings::new(1.0)),
            RendererParams::new(frame, 1.0),
            &LogoSilhouette::new(frame, 1.0),
            10.0,
        );
        renderer.render().expect("render");
        renderer.advance(0.6);
        assert!(!renderer.needs_redraw());
        renderer.advance(0.6);
        assert!(renderer.needs_redraw());
    }
}
