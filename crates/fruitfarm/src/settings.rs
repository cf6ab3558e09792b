use crate::animation::{SpeedPhaseRanges, DEFAULT_REDRAW_INTERVAL};

/// Colour-cycle pacing for one effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSettings {
    pub seconds_per_color: f32,
}

impl CycleSettings {
    pub const fn new(seconds_per_color: f32) -> Self {
        Self { seconds_per_color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainbowSettings {
    pub seconds_per_color: f32,
    /// Bar scroll speed in points per second.
    pub scroll_speed: f32,
}

impl Default for RainbowSettings {
    fn default() -> Self {
        Self {
            seconds_per_color: 10.0,
            scroll_speed: 3.0,
        }
    }
}

/// Tuning handed to every renderer the factory builds.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSettings {
    /// Seed for each renderer's private RNG.
    pub seed: u64,
    /// Minimum seconds between throttled redraws.
    pub redraw_interval: f32,
    pub solid: CycleSettings,
    pub linear_gradient: CycleSettings,
    pub circular_gradient: CycleSettings,
    pub rainbow: RainbowSettings,
    pub liquid: CycleSettings,
    pub psy: SpeedPhaseRanges,
    pub warp: SpeedPhaseRanges,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            redraw_interval: DEFAULT_REDRAW_INTERVAL,
            solid: CycleSettings::new(10.0),
            linear_gradient: CycleSettings::new(2.0),
            circular_gradient: CycleSettings::new(2.0),
            rainbow: RainbowSettings::default(),
            liquid: CycleSettings::new(10.0),
            psy: SpeedPhaseRanges::PSY,
            warp: SpeedPhaseRanges::WARP,
        }
    }
}
