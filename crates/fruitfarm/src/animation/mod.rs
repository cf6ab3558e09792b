//! Time-driven state shared by the effect renderers.
//!
//! - `color_cycle` walks the palette ring and exposes the blend fraction.
//! - `speed_phase` eases a time scale between calm and intense regimes.
//! - [`RedrawThrottle`] decouples the redraw rate from the host tick rate.
//! - [`Easing`] holds the curves used by the above.

mod color_cycle;
mod speed_phase;

pub use color_cycle::ColorCycle;
pub use speed_phase::{Phase, PhaseRange, SpeedPhase, SpeedPhaseRanges};

/// Default minimum time between redraw requests.
pub const DEFAULT_REDRAW_INTERVAL: f32 = 1.0 / 30.0;

/// Shapes available to eased transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Smoothstep,
    /// Symmetric power curve, `p = 4`.
    QuarticInOut,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        let clamped = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Easing::Linear => clamped,
            Easing::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            Easing::QuarticInOut => {
                if clamped < 0.5 {
                    0.5 * (2.0 * clamped).powi(4)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - clamped)).powi(4)
                }
            }
        }
    }
}

/// Accumulates tick time and fires once the redraw interval has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawThrottle {
    since_last: f32,
    interval: f32,
}

impl RedrawThrottle {
    pub fn new(interval: f32) -> Self {
        let interval = if interval.is_finite() {
            interval.max(0.0)
        } else {
            DEFAULT_REDRAW_INTERVAL
        };
        Self {
            since_last: 0.0,
            interval,
        }
    }

    /// Adds `delta` and reports whether a redraw should be requested.
    ///
    /// `force` fires regardless of the interval (discrete events such as a
    /// colour change). A zero delta without `force` never fires.
    pub fn tick(&mut self, delta: f32, force: bool) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            if force {
                self.since_last = 0.0;
            }
            return force;
        }
        self.since_last += delta;
        if force || self.since_last >= self.interval {
            self.since_last = 0.0;
            true
        } else {
            false
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }
}

impl Default for RedrawThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REDRAW_INTERVAL)
    }
}
