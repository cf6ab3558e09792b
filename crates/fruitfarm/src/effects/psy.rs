use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::animation::{Phase, SpeedPhase, SpeedPhaseRanges};
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::types::BackgroundEffect;

const HUE_DRIFT: f32 = 0.02;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PsyUniforms {
    resolution: [f32; 2],
    time: f32,
    color_phase: f32,
}

/// Layered domain warps and interference bands whose time scale swings
/// between long calm stretches and short frantic bursts.
#[derive(Debug, Clone)]
pub struct PsyEffect {
    speed: SpeedPhase,
    total_elapsed: f32,
    color_phase: f32,
}

impl PsyEffect {
    /// Starts calm at unit speed; the first burst is sampled after two
    /// seconds.
    pub fn new(ranges: SpeedPhaseRanges, seed: u64) -> Self {
        Self::with_controller(SpeedPhase::with_state(ranges, seed, Phase::Slow, 1.0, 1.0, 2.0))
    }

    pub fn with_controller(speed: SpeedPhase) -> Self {
        Self {
            speed,
            total_elapsed: 0.0,
            color_phase: 0.0,
        }
    }

    pub fn speed(&self) -> &SpeedPhase {
        &self.speed
    }

    /// Speed-scaled time fed to the shader.
    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    pub fn color_phase(&self) -> f32 {
        self.color_phase
    }
}

impl Effect for PsyEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Psy
    }

    fn fragment_source(&self) -> &'static str {
        concat!(
            include_str!("shaders/flow_field.glsl"),
            include_str!("shaders/psy.glsl")
        )
    }

    fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        if self.speed.advance(delta) {
            trace!(phase = ?self.speed.phase(), target = self.speed.target_speed(), "psy phase flip");
        }
        self.total_elapsed += delta * self.speed.current_speed();
        self.color_phase = (self.total_elapsed * HUE_DRIFT).fract();
        false
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&PsyUniforms {
            resolution: frame.resolution(),
            time: self.total_elapsed,
            color_phase: self.color_phase,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_advances_at_the_current_speed() {
        let mut psy = PsyEffect::new(SpeedPhaseRanges::PSY, 3);
        psy.advance(1.0);
        assert!((psy.total_elapsed() - 1.0).abs() < 1e-5);
        assert_eq!(psy.speed().phase(), Phase::Slow);
    }

    #[test]
    fn first_burst_starts_after_two_seconds() {
        let mut psy = PsyEffect::new(SpeedPhaseRanges::PSY, 3);
        psy.advance(1.5);
        psy.advance(0.6);
        assert_eq!(psy.speed().phase(), Phase::Fast);
        let range = SpeedPhaseRanges::PSY.fast;
        assert!(psy.speed().target_speed() >= range.speed.0);
        assert!(psy.speed().target_speed() <= range.speed.1);
    }
}
