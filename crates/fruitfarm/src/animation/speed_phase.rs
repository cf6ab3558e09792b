use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Easing;

const MIN_PHASE_DURATION: f32 = 1e-3;
/// Upper bound on phase flips handled in a single tick.
const MAX_FLIPS_PER_TICK: usize = 64;

/// Regime of a [`SpeedPhase`] controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Slow,
    Fast,
}

impl Phase {
    pub fn toggled(self) -> Self {
        match self {
            Phase::Slow => Phase::Fast,
            Phase::Fast => Phase::Slow,
        }
    }
}

/// Inclusive sampling ranges for one regime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseRange {
    pub speed: (f32, f32),
    pub duration: (f32, f32),
}

impl PhaseRange {
    pub const fn new(speed: (f32, f32), duration: (f32, f32)) -> Self {
        Self { speed, duration }
    }
}

/// Sampling ranges for both regimes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPhaseRanges {
    pub slow: PhaseRange,
    pub fast: PhaseRange,
}

impl SpeedPhaseRanges {
    /// Starfield: long cruises punctuated by long jumps to warp.
    pub const WARP: SpeedPhaseRanges = SpeedPhaseRanges {
        fast: PhaseRange::new((8.0, 14.0), (15.0, 30.0)),
        slow: PhaseRange::new((0.05, 0.15), (25.0, 45.0)),
    };

    /// Psychedelic field: short bursts between slow drifts.
    pub const PSY: SpeedPhaseRanges = SpeedPhaseRanges {
        fast: PhaseRange::new((1.6, 2.8), (1.5, 3.0)),
        slow: PhaseRange::new((0.08, 0.25), (20.0, 40.0)),
    };

    pub fn for_phase(&self, phase: Phase) -> &PhaseRange {
        match phase {
            Phase::Slow => &self.slow,
            Phase::Fast => &self.fast,
        }
    }
}

/// Two-state oscillator easing a time scale between slow and fast regimes.
///
/// Every flip starts the new phase from the speed the finished phase reached
/// (its target), then samples a target speed and phase duration from the new
/// regime's ranges.
#[derive(Debug, Clone)]
pub struct SpeedPhase {
    phase: Phase,
    current_speed: f32,
    start_speed: f32,
    target_speed: f32,
    timer: f32,
    phase_duration: f32,
    ranges: SpeedPhaseRanges,
    easing: Easing,
    rng: StdRng,
}

impl SpeedPhase {
    /// Creates a controller in an explicit state.
    pub fn with_state(
        ranges: SpeedPhaseRanges,
        seed: u64,
        phase: Phase,
        start_speed: f32,
        target_speed: f32,
        phase_duration: f32,
    ) -> Self {
        let start_speed = sanitize_speed(start_speed);
        Self {
            phase,
            current_speed: start_speed,
            start_speed,
            target_speed: sanitize_speed(target_speed),
            timer: 0.0,
            phase_duration: sanitize_duration(phase_duration),
            ranges,
            easing: Easing::QuarticInOut,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a controller whose first phase is sampled from `ranges`.
    pub fn sampled(ranges: SpeedPhaseRanges, seed: u64, phase: Phase, start_speed: f32) -> Self {
        let mut controller = Self::with_state(ranges, seed, phase, start_speed, start_speed, 1.0);
        controller.resample();
        controller
    }

    /// Advances the phase timer and re-evaluates the eased speed.
    ///
    /// Returns `true` when at least one phase flip happened.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !(delta.is_finite() && delta > 0.0) {
            return false;
        }
        self.timer += delta;
        let mut flipped = false;
        let mut flips = 0;
        while self.timer >= self.phase_duration {
            if flips == MAX_FLIPS_PER_TICK {
                self.timer = 0.0;
                break;
            }
            self.timer -= self.phase_duration;
            // A completed phase always ends on its target.
            self.start_speed = self.target_speed;
            self.phase = self.phase.toggled();
            self.resample();
            flips += 1;
            flipped = true;
        }
        let eased = self.easing.sample(self.progress());
        self.current_speed =
            sanitize_speed(self.start_speed + (self.target_speed - self.start_speed) * eased);
        flipped
    }

    fn resample(&mut self) {
        let range = *self.ranges.for_phase(self.phase);
        self.target_speed = sanitize_speed(sample(&mut self.rng, range.speed));
        self.phase_duration = sanitize_duration(sample(&mut self.rng, range.duration));
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_fast(&self) -> bool {
        self.phase == Phase::Fast
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn start_speed(&self) -> f32 {
        self.start_speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn phase_duration(&self) -> f32 {
        self.phase_duration
    }

    pub fn ranges(&self) -> &SpeedPhaseRanges {
        &self.ranges
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.timer / self.phase_duration).clamp(0.0, 1.0)
    }
}

fn sample(rng: &mut StdRng, (low, high): (f32, f32)) -> f32 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    if (high - low).abs() <= f32::EPSILON {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

fn sanitize_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.max(0.0)
    } else {
        0.0
    }
}

fn sanitize_duration(duration: f32) -> f32 {
    if duration.is_finite() {
        duration.max(MIN_PHASE_DURATION)
    } else {
        MIN_PHASE_DURATION
    }
}
