use std::time::{Duration, Instant};

/// Fixed step used when no reliable wall-clock delta is available.
pub const DEFAULT_FRAME_STEP: f32 = 1.0 / 60.0;

/// Source of per-tick delta times handed to [`crate::Background::advance`].
///
/// The host owns the clock; renderers never read process-wide time.
pub trait FrameClock {
    /// Seconds elapsed since the previous tick.
    fn tick(&mut self) -> f32;
}

/// Wall-clock deltas, falling back to a fixed step for the first tick and
/// whenever the measured delta is not in `(0, 1)` seconds.
#[derive(Debug, Clone)]
pub struct SystemClock {
    last: Option<Instant>,
    fallback_step: f32,
}

impl SystemClock {
    pub fn new(frames_per_second: f32) -> Self {
        Self {
            last: None,
            fallback_step: step_for_fps(frames_per_second),
        }
    }

    /// Converts a measured interval into the delta reported to renderers.
    pub fn delta_for(&self, elapsed: Option<Duration>) -> f32 {
        match elapsed.map(|value| value.as_secs_f32()) {
            Some(delta) if delta > 0.0 && delta < 1.0 => delta,
            _ => self.fallback_step,
        }
    }

    pub fn fallback_step(&self) -> f32 {
        self.fallback_step
    }
}

impl FrameClock for SystemClock {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self.last.map(|last| now.saturating_duration_since(last));
        self.last = Some(now);
        self.delta_for(elapsed)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}

/// Deterministic clock advancing by a constant step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    step: f32,
    ticks: u64,
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() && step >= 0.0 {
            step
        } else {
            DEFAULT_FRAME_STEP
        };
        Self { step, ticks: 0 }
    }

    pub fn from_fps(frames_per_second: f32) -> Self {
        Self::new(step_for_fps(frames_per_second))
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Simulated seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * f64::from(self.step)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl FrameClock for FixedStepClock {
    fn tick(&mut self) -> f32 {
        self.ticks += 1;
        self.step
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_STEP)
    }
}

fn step_for_fps(frames_per_second: f32) -> f32 {
    if frames_per_second.is_finite() && frames_per_second > 0.0 {
        1.0 / frames_per_second
    } else {
        DEFAULT_FRAME_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_uses_fallback_for_first_and_stalled_ticks() {
        let clock = SystemClock::new(30.0);
        assert!((clock.delta_for(None) - 1.0 / 30.0).abs() < 1e-6);
        assert!((clock.delta_for(Some(Duration::from_secs(3))) - 1.0 / 30.0).abs() < 1e-6);
        assert!((clock.delta_for(Some(Duration::ZERO)) - 1.0 / 30.0).abs() < 1e-6);
        assert!((clock.delta_for(Some(Duration::from_millis(8))) - 0.008).abs() < 1e-6);
    }

    #[test]
    fn fixed_clock_accumulates_ticks() {
        let mut clock = FixedStepClock::from_fps(50.0);
        for _ in 0..100 {
            assert!((clock.tick() - 0.02).abs() < 1e-7);
        }
        assert_eq!(clock.ticks(), 100);
        assert!((clock.elapsed() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn invalid_rates_fall_back_to_sixty_fps() {
        assert!((FixedStepClock::from_fps(0.0).step() - DEFAULT_FRAME_STEP).abs() < 1e-7);
        assert!((SystemClock::new(f32::NAN).fallback_step() - DEFAULT_FRAME_STEP).abs() < 1e-7);
    }
}
