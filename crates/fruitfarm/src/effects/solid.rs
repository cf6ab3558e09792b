use bytemuck::{Pod, Zeroable};

use crate::animation::ColorCycle;
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::settings::CycleSettings;
use crate::types::BackgroundEffect;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct SolidUniforms {
    color: [f32; 4],
}

/// One palette colour filling the whole drawable, blending into the next.
#[derive(Debug, Clone)]
pub struct SolidEffect {
    cycle: ColorCycle,
}

impl SolidEffect {
    pub fn new(settings: CycleSettings) -> Self {
        Self {
            cycle: ColorCycle::new(settings.seconds_per_color),
        }
    }

    pub fn cycle(&self) -> &ColorCycle {
        &self.cycle
    }
}

impl Effect for SolidEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Solid
    }

    fn fragment_source(&self) -> &'static str {
        include_str!("shaders/solid.glsl")
    }

    fn advance(&mut self, delta: f32) -> bool {
        self.cycle.advance(delta)
    }

    fn write_uniforms(&self, _frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&SolidUniforms {
            color: self.cycle.current_color().to_array(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    #[test]
    fn colour_blends_half_way_mid_cycle() {
        let mut solid = SolidEffect::new(CycleSettings::new(10.0));
        assert!(!solid.advance(5.0));
        let expected = palette::color(0).lerp(palette::color(1), 0.5);
        assert_eq!(solid.cycle().current_color(), expected);
    }

    #[test]
    fn palette_step_is_a_discrete_event() {
        let mut solid = SolidEffect::new(CycleSettings::new(10.0));
        assert!(solid.advance(10.5));
        assert_eq!(solid.cycle().color_index(), 1);
        assert!((solid.cycle().elapsed() - 0.5).abs() < 1e-5);
    }
}
