use bytemuck::{Pod, Zeroable};

/// Straight-alpha colour with `f32` channels in `[0, 1]`.
///
/// Laid out as a GLSL `vec4` so palettes can be copied into uniform blocks.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque colour from 8-bit sRGB components.
    pub const fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Blends towards `other`, clamping every channel to `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |from: f32, to: f32| (from + (to - from) * t).clamp(0.0, 1.0);
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Number of entries in [`PALETTE`].
pub const PALETTE_SIZE: usize = 6;

/// The logo stripes, top to bottom.
pub const PALETTE: [Rgba; PALETTE_SIZE] = [
    Rgba::from_srgb8(67, 156, 214),  // blue
    Rgba::from_srgb8(139, 69, 147),  // purple
    Rgba::from_srgb8(207, 72, 69),   // red
    Rgba::from_srgb8(231, 135, 59),  // orange
    Rgba::from_srgb8(243, 185, 75),  // yellow
    Rgba::from_srgb8(120, 184, 86),  // green
];

/// Palette entry at `index`, or opaque black when out of range.
pub fn color(index: usize) -> Rgba {
    PALETTE.get(index).copied().unwrap_or(Rgba::BLACK)
}

/// Entry following `index` in the ring.
pub fn next_index(index: usize) -> usize {
    (index + 1) % PALETTE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_falls_back_to_black() {
        assert_eq!(color(PALETTE_SIZE), Rgba::BLACK);
        assert_eq!(color(usize::MAX), Rgba::BLACK);
        assert_eq!(color(0), PALETTE[0]);
    }

    #[test]
    fn lerp_hits_endpoints_and_clamps() {
        let from = PALETTE[0];
        let to = PALETTE[1];
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        assert_eq!(from.lerp(to, 4.0), to);
        assert_eq!(from.lerp(to, f32::NAN), from);
    }

    #[test]
    fn ring_wraps_back_to_blue() {
        assert_eq!(next_index(PALETTE_SIZE - 1), 0);
        assert!((PALETTE[0].r - 67.0 / 255.0).abs() < 1e-6);
    }
}
