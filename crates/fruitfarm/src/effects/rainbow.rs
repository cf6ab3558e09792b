use bytemuck::{Pod, Zeroable};

use crate::animation::ColorCycle;
use crate::background::{Effect, FrameContext, UniformWriter};
use crate::palette::PALETTE_SIZE;
use crate::settings::RainbowSettings;
use crate::silhouette::ShapeMetrics;
use crate::types::BackgroundEffect;

use super::gradient_colors;

/// Bars visible across the logo at once.
pub const VISIBLE_BARS: usize = 6;
/// Total bars, so the stack stays covered while it scrolls.
pub const BAR_COUNT: usize = VISIBLE_BARS * 3;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RainbowUniforms {
    resolution: [f32; 2],
    content_scale: f32,
    frame_height: f32,
    first_bar_y: f32,
    bar_height: f32,
    scroll_offset: f32,
    bar_count: i32,
}

/// Horizontal palette stripes scrolling upwards behind the logo.
#[derive(Debug, Clone)]
pub struct RainbowEffect {
    cycle: ColorCycle,
    scroll_speed: f32,
    bar_height: f32,
    shape_height: f32,
    offset: f32,
}

impl RainbowEffect {
    pub fn new(settings: RainbowSettings) -> Self {
        Self {
            cycle: ColorCycle::new(settings.seconds_per_color),
            scroll_speed: if settings.scroll_speed.is_finite() {
                settings.scroll_speed.max(0.0)
            } else {
                0.0
            },
            bar_height: 0.0,
            shape_height: 0.0,
            offset: 0.0,
        }
    }

    pub fn cycle(&self) -> &ColorCycle {
        &self.cycle
    }

    pub fn bar_height(&self) -> f32 {
        self.bar_height
    }

    /// Shared upward scroll of every bar, in points.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Bottom edge of the lowest bar before scrolling, in points.
    pub fn first_bar_y(&self, frame_height: f32) -> f32 {
        frame_height * 0.5 - self.shape_height - self.bar_height * VISIBLE_BARS as f32
    }

    /// Palette entry bar `bar` starts from.
    pub fn bar_color_index(&self, bar: usize) -> usize {
        (bar + self.cycle.color_index()) % PALETTE_SIZE
    }
}

impl Effect for RainbowEffect {
    fn kind(&self) -> BackgroundEffect {
        BackgroundEffect::Rainbow
    }

    fn fragment_source(&self) -> &'static str {
        include_str!("shaders/rainbow.glsl")
    }

    fn configure(&mut self, shape: &ShapeMetrics) {
        self.shape_height = shape.bounds.height.max(0.0);
        self.bar_height = self.shape_height / VISIBLE_BARS as f32;
        self.offset = 0.0;
    }

    fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        let next = self.offset + self.scroll_speed * delta;
        self.offset = if next > self.bar_height * VISIBLE_BARS as f32 {
            0.0
        } else {
            next
        };
        self.cycle.advance(delta)
    }

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
        out.push(&RainbowUniforms {
            resolution: frame.resolution(),
            content_scale: frame.content_scale,
            frame_height: frame.frame.height,
            first_bar_y: self.first_bar_y(frame.frame.height),
            bar_height: self.bar_height,
            scroll_offset: self.offset,
            bar_count: BAR_COUNT as i32,
        })
        .push_slice(&gradient_colors(&self.cycle));
    }
}
