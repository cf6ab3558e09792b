//! The nine background effects and the factory that builds them.

mod circular_gradient;
mod linear_gradient;
mod liquid;
mod ocean;
mod psy;
pub mod puppy;
mod rainbow;
mod solid;
pub mod warp;

pub use circular_gradient::CircularGradientEffect;
pub use linear_gradient::LinearGradientEffect;
pub use liquid::LiquidEffect;
pub use ocean::OceanEffect;
pub use psy::PsyEffect;
pub use puppy::PuppyEffect;
pub use rainbow::RainbowEffect;
pub use solid::SolidEffect;
pub use warp::WarpEffect;

use tracing::{info, warn};

use crate::animation::ColorCycle;
use crate::background::{Background, Effect, EffectRenderer, FallbackBackground};
use crate::gpu::GpuContext;
use crate::palette::{Rgba, PALETTE_SIZE};
use crate::settings::BackgroundSettings;
use crate::silhouette::Silhouette;
use crate::types::{BackgroundEffect, RendererParams};

/// Builds the renderer for `effect`.
///
/// Without a device, or when the effect's pipeline cannot be built, a
/// [`FallbackBackground`] is returned instead so the host keeps running.
pub fn create_background(
    effect: BackgroundEffect,
    params: RendererParams,
    shape: &dyn Silhouette,
    settings: &BackgroundSettings,
    gpu: Option<&GpuContext>,
) -> Box<dyn Background> {
    match effect {
        BackgroundEffect::Solid => {
            build(SolidEffect::new(settings.solid), params, shape, settings, gpu)
        }
        BackgroundEffect::LinearGradient => build(
            LinearGradientEffect::new(settings.linear_gradient),
            params,
            shape,
            settings,
            gpu,
        ),
        BackgroundEffect::CircularGradient => build(
            CircularGradientEffect::new(settings.circular_gradient),
            params,
            shape,
            settings,
            gpu,
        ),
        BackgroundEffect::Rainbow => {
            build(RainbowEffect::new(settings.rainbow), params, shape, settings, gpu)
        }
        BackgroundEffect::Liquid => {
            build(LiquidEffect::new(settings.liquid), params, shape, settings, gpu)
        }
        BackgroundEffect::Ocean => build(OceanEffect::new(), params, shape, settings, gpu),
        BackgroundEffect::Psy => build(
            PsyEffect::new(settings.psy, settings.seed),
            params,
            shape,
            settings,
            gpu,
        ),
        BackgroundEffect::Puppy => build(PuppyEffect::new(), params, shape, settings, gpu),
        BackgroundEffect::Warp => build(
            WarpEffect::new(settings.warp, settings.seed),
            params,
            shape,
            settings,
            gpu,
        ),
    }
}

fn build<E: Effect + 'static>(
    program: E,
    params: RendererParams,
    shape: &dyn Silhouette,
    settings: &BackgroundSettings,
    gpu: Option<&GpuContext>,
) -> Box<dyn Background> {
    let kind = program.kind();
    let Some(gpu) = gpu else {
        warn!(effect = %kind, "no GPU device available, using static fallback");
        return Box::new(FallbackBackground::new(kind, params));
    };

    let mut renderer = EffectRenderer::new(program, params, shape, settings.redraw_interval);
    match renderer.attach(gpu) {
        Ok(()) => {
            let (width, height) = params.pixel_size();
            info!(effect = %kind, width, height, "background ready");
            Box::new(renderer)
        }
        Err(err) => {
            warn!(effect = %kind, %err, "background failed to build, using static fallback");
            Box::new(FallbackBackground::new(kind, params).with_target(gpu))
        }
    }
}

/// Palette rotated to the cycle's index and blended by its progress.
pub(crate) fn gradient_colors(cycle: &ColorCycle) -> [Rgba; PALETTE_SIZE] {
    cycle.gradient_stops()
}

/// Evenly spaced stop positions `i / 5`, one per `vec4` slot.
pub(crate) fn stop_locations() -> [[f32; 4]; PALETTE_SIZE] {
    let last = (PALETTE_SIZE - 1) as f32;
    std::array::from_fn(|index| [index as f32 / last, 0.0, 0.0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silhouette::LogoSilhouette;
    use crate::types::Rect;

    #[test]
    fn stops_span_zero_to_one() {
        let stops = stop_locations();
        assert_eq!(stops[0][0], 0.0);
        assert_eq!(stops[PALETTE_SIZE - 1][0], 1.0);
        assert!((stops[2][0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn every_effect_falls_back_without_a_device() {
        let frame = Rect::from_size(200.0, 100.0);
        let shape = LogoSilhouette::new(frame, 1.0);
        let settings = BackgroundSettings::default();
        for effect in BackgroundEffect::ALL {
            let mut background =
                create_background(effect, RendererParams::new(frame, 2.0), &shape, &settings, None);
            assert_eq!(background.kind(), effect);
            assert!(background.render().expect("render"));
            assert!(background.read_frame().expect("read").is_none());
        }
    }
}
