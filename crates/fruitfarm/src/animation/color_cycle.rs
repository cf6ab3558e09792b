use crate::palette::{self, Rgba, PALETTE_SIZE};

const MIN_SECONDS_PER_COLOR: f32 = 1e-3;

/// Walks the palette ring, one entry per `seconds_per_color`.
///
/// `color_index` is always in `[0, PALETTE_SIZE)`; `elapsed` is the time
/// spent blending from the current entry towards the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycle {
    color_index: usize,
    elapsed: f32,
    seconds_per_color: f32,
}

impl ColorCycle {
    pub fn new(seconds_per_color: f32) -> Self {
        let seconds_per_color = if seconds_per_color.is_finite() {
            seconds_per_color.max(MIN_SECONDS_PER_COLOR)
        } else {
            MIN_SECONDS_PER_COLOR
        };
        Self {
            color_index: 0,
            elapsed: 0.0,
            seconds_per_color,
        }
    }

    /// Advances the cycle, wrapping as many times as `delta` spans.
    ///
    /// Returns `true` when at least one palette step completed.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed < self.seconds_per_color {
            return false;
        }
        // Closed form: constant cost however many colours `delta` spans.
        let steps = (self.elapsed / self.seconds_per_color).floor();
        self.elapsed = self.elapsed.rem_euclid(self.seconds_per_color);
        if !(self.elapsed.is_finite() && self.elapsed < self.seconds_per_color) {
            self.elapsed = 0.0;
        }
        let offset = (steps as u64 % PALETTE_SIZE as u64) as usize;
        self.color_index = (self.color_index + offset) % PALETTE_SIZE;
        true
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn seconds_per_color(&self) -> f32 {
        self.seconds_per_color
    }

    /// Blend fraction towards the next palette entry, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.seconds_per_color).clamp(0.0, 1.0)
    }

    /// Current entry blended towards the next one.
    pub fn current_color(&self) -> Rgba {
        self.blend(0)
    }

    /// Stop `offset` of a gradient that starts at the current entry.
    pub fn blend(&self, offset: usize) -> Rgba {
        let from = (self.color_index + offset) % PALETTE_SIZE;
        palette::color(from).lerp(palette::color(palette::next_index(from)), self.progress())
    }

    /// All palette entries rotated to start at the current index and blended.
    pub fn gradient_stops(&self) -> [Rgba; PALETTE_SIZE] {
        std::array::from_fn(|offset| self.blend(offset))
    }
}
