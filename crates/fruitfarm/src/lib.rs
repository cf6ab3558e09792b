//! Animated backgrounds drawn behind a logo silhouette.
//!
//! Each effect is a small CPU-side program paired with a GLSL fragment shader.
//! The host owns a [`Stage`], feeds it frame deltas and asks it to render when
//! the live background requests a redraw:
//!
//! ```text
//!   host loop ── FrameClock::tick() ──▶ Stage::advance(dt)
//!        │                                   │
//!        │                                   ▼
//!        │                     EffectRenderer<E>::advance ─▶ Effect::advance
//!        │                                   │        (colour cycle, phases)
//!        ▼                                   ▼
//!   Stage::render_if_needed ──▶ Effect::write_uniforms ─▶ GpuResources::draw
//!                                                              │
//!                                              offscreen RGBA target ◀┘
//! ```
//!
//! Renderers are built by [`create_background`]. When no device is available,
//! or an effect's program fails to build, a [`FallbackBackground`] that draws
//! nothing takes its place, so the host never handles a missing renderer.
//! Only one renderer lives at a time; switching effects releases the old
//! resource set before the new one is allocated.

pub mod animation;
mod background;
mod compile;
pub mod effects;
pub mod gpu;
pub mod palette;
mod runtime;
mod scissor;
mod settings;
mod silhouette;
mod stage;
mod types;

pub use animation::{
    ColorCycle, Easing, Phase, PhaseRange, RedrawThrottle, SpeedPhase, SpeedPhaseRanges,
    DEFAULT_REDRAW_INTERVAL,
};
pub use background::{
    Background, Effect, EffectRenderer, FallbackBackground, FrameContext, UniformWriter,
};
pub use effects::{
    create_background, CircularGradientEffect, LinearGradientEffect, LiquidEffect, OceanEffect,
    PsyEffect, PuppyEffect, RainbowEffect, SolidEffect, WarpEffect,
};
pub use gpu::{AdapterProfile, GpuContext, GpuError, GpuPowerPreference};
pub use palette::{Rgba, PALETTE, PALETTE_SIZE};
pub use runtime::{FixedStepClock, FrameClock, SystemClock, DEFAULT_FRAME_STEP};
pub use scissor::{logo_scissor, ScissorRect, SCISSOR_MARGIN};
pub use settings::{BackgroundSettings, CycleSettings, RainbowSettings};
pub use silhouette::{
    LogoSilhouette, ShapeMetrics, Silhouette, LEAF_EXTRA_RATIO, LOGO_BODY_HEIGHT, LOGO_BODY_WIDTH,
};
pub use stage::{EffectMode, Stage};
pub use types::{BackgroundEffect, Rect, RendererParams};
