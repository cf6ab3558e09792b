use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::animation::{Phase, SpeedPhase, SpeedPhaseRanges};
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::scissor::{logo_scissor, ScissorRect};
use crate::types::BackgroundEffect;

/// Star layers cycling through depth.
pub const LAYER_COUNT: usize = 20;
/// Points mapped to one unit of star space at content scale 1.
pub const REFERENCE_SIZE: f32 = 300.0;
/// Depth travelled per second at unit speed, in layer cycles.
const SCROLL_RATE: f32 = 0.25;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct WarpUniforms {
    resolution: [f32; 2],
    time: f32,
    speed: f32,
    reference_size: f32,
    scroll: f32,
    _pad: [f32; 2],
}

/// Starfield flying towards the viewer, alternating between a slow drift
/// and long warp jumps with streaks, Doppler tint and a central glow.
#[derive(Debug, Clone)]
pub struct WarpEffect {
    speed: SpeedPhase,
    time: f32,
    scroll: f32,
}

impl WarpEffect {
    /// Starts by spooling up from a drift towards warp over two seconds.
    pub fn new(ranges: SpeedPhaseRanges, seed: u64) -> Self {
        Self::with_controller(SpeedPhase::with_state(ranges, seed, Phase::Fast, 0.3, 5.0, 2.0))
    }

    pub fn with_controller(speed: SpeedPhase) -> Self {
        Self {
            speed,
            time: 0.0,
            scroll: 0.0,
        }
    }

    pub fn speed(&self) -> &SpeedPhase {
        &self.speed
    }

    pub fn is_warp_phase(&self) -> bool {
        self.speed.is_fast()
    }

    /// Unscaled seconds since creation; drives twinkle.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Speed-integrated depth offset in `[0, 1)`.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Depth fraction of `layer`, 0 far away and 1 at the viewer.
    pub fn layer_depth(&self, layer: usize) -> f32 {
        fract(layer as f32 / LAYER_COUNT as f32 + self.scroll)
    }
}

impl Effect for WarpEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Warp
    }

    fn fragment_source(&self) -> &'static str {
        include_str!("shaders/warp.glsl")
    }

    fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        if self.speed.advance(delta) {
            trace!(
                warp = self.speed.is_fast(),
                target = self.speed.target_speed(),
                duration = self.speed.phase_duration(),
                "warp phase flip"
            );
        }
        self.time += delta;
        self.scroll = fract(self.scroll + delta * self.speed.current_speed() * SCROLL_RATE);
        false
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&WarpUniforms {
            resolution: frame.resolution(),
            time: self.time,
            speed: self.speed.current_speed(),
            reference_size: REFERENCE_SIZE * frame.content_scale,
            scroll: self.scroll,
            _pad: [0.0; 2],
        });
    }

    fn scissor(&self, frame: &FrameContext) -> Option<ScissorRect> {
        logo_scissor(frame.frame, frame.content_scale, &frame.shape)
    }
}

/// CPU copy of the shader's per-cell star hash, returning a value in
/// `[0, 1)`.
pub fn star_hash(p: [f32; 2]) -> f32 {
    let mut p3 = [fract(p[0] * 0.1031), fract(p[1] * 0.1031), fract(p[0] * 0.1031)];
    let d = p3[0] * (p3[1] + 33.33) + p3[1] * (p3[2] + 33.33) + p3[2] * (p3[0] + 33.33);
    for component in &mut p3 {
        *component += d;
    }
    fract((p3[0] + p3[1]) * p3[2])
}

/// Whether a cell hash keeps its star at `speed`.
pub fn star_survives(hash: f32, speed: f32) -> bool {
    hash >= cull_threshold(speed)
}

/// Hash value below which a cell stays empty; higher while cruising.
pub fn cull_threshold(speed: f32) -> f32 {
    let t = smoothstep(0.3, 2.0, speed);
    0.35 + (0.15 - 0.35) * t
}

// GLSL semantics: `x - floor(x)`, never negative.
fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stays_in_unit_interval() {
        for y in -20..20 {
            for x in -20..20 {
                let value = star_hash([x as f32, y as f32]);
                assert!((0.0..=1.0).contains(&value), "{x},{y} -> {value}");
            }
        }
    }

    #[test]
    fn slow_speed_culls_more_stars() {
        assert!((cull_threshold(0.1) - 0.35).abs() < 1e-6);
        assert!((cull_threshold(8.0) - 0.15).abs() < 1e-6);
        let cells: Vec<f32> = (0..400).map(|i| star_hash([i as f32, 3.0])).collect();
        let slow = cells.iter().filter(|h| star_survives(**h, 0.1)).count();
        let fast = cells.iter().filter(|h| star_survives(**h, 8.0)).count();
        assert!(slow < fast);
    }

    #[test]
    fn scroll_follows_integrated_speed() {
        let mut warp = WarpEffect::new(SpeedPhaseRanges::WARP, 11);
        warp.advance(0.5);
        let expected = 0.5 * warp.speed().current_speed() * SCROLL_RATE;
        assert!((warp.scroll() - expected).abs() < 1e-5);
        assert!((warp.time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn starts_in_warp_phase() {
        let warp = WarpEffect::new(SpeedPhaseRanges::WARP, 11);
        assert!(warp.is_warp_phase());
        assert!((warp.speed().current_speed() - 0.3).abs() < 1e-6);
        assert!((warp.speed().target_speed() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn layers_are_spread_through_depth() {
        let warp = WarpEffect::new(SpeedPhaseRanges::WARP, 11);
        assert_eq!(warp.layer_depth(0), 0.0);
        assert!((warp.layer_depth(10) - 0.5).abs() < 1e-6);
    }
}
