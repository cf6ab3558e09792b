use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::background::Background;
use crate::effects::create_background;
use crate::gpu::{GpuContext, GpuError};
use crate::settings::BackgroundSettings;
use crate::silhouette::Silhouette;
use crate::types::{BackgroundEffect, Rect, RendererParams};

/// How the stage chooses its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectMode {
    Specific(BackgroundEffect),
    Random,
}

impl Default for EffectMode {
    fn default() -> Self {
        EffectMode::Specific(BackgroundEffect::Rainbow)
    }
}

/// Host-side owner of the single live background.
///
/// Every switch tears the old renderer down before the next one is built, so
/// two resource sets never coexist.
pub struct Stage<S> {
    shape: S,
    params: RendererParams,
    settings: BackgroundSettings,
    gpu: Option<GpuContext>,
    mode: EffectMode,
    rng: StdRng,
    active: Option<Box<dyn Background>>,
}

impl<S: Silhouette> Stage<S> {
    pub fn new(
        mode: EffectMode,
        params: RendererParams,
        shape: S,
        settings: BackgroundSettings,
        gpu: Option<GpuContext>,
    ) -> Self {
        let mut stage = Self {
            shape,
            params,
            rng: StdRng::seed_from_u64(settings.seed),
            settings,
            gpu,
            mode,
            active: None,
        };
        let effect = stage.pick(mode);
        stage.switch_effect(effect);
        stage
    }

    pub fn mode(&self) -> EffectMode {
        self.mode
    }

    pub fn params(&self) -> RendererParams {
        self.params
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// The effect currently on stage.
    pub fn effect(&self) -> Option<BackgroundEffect> {
        self.active.as_ref().map(|background| background.kind())
    }

    pub fn background(&self) -> Option<&dyn Background> {
        self.active.as_deref()
    }

    /// Replaces the live renderer with a fresh `effect`.
    pub fn switch_effect(&mut self, effect: BackgroundEffect) {
        if let Some(previous) = self.active.take() {
            debug!(from = %previous.kind(), to = %effect, "switching background");
            drop(previous);
        }
        self.active = Some(create_background(
            effect,
            self.params,
            &self.shape,
            &self.settings,
            self.gpu.as_ref(),
        ));
    }

    /// Applies a new selection mode and rebuilds the renderer.
    pub fn set_mode(&mut self, mode: EffectMode) {
        self.mode = mode;
        let effect = self.pick(mode);
        self.switch_effect(effect);
    }

    /// Picks a new random effect, different from the current one.
    pub fn shuffle(&mut self) -> BackgroundEffect {
        let current = self.effect();
        let candidates: Vec<BackgroundEffect> = BackgroundEffect::ALL
            .into_iter()
            .filter(|effect| Some(*effect) != current)
            .collect();
        let effect = candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(BackgroundEffect::Rainbow);
        self.switch_effect(effect);
        effect
    }

    /// A new content scale means a new drawable format; the renderer is
    /// rebuilt from scratch.
    pub fn set_content_scale(&mut self, content_scale: f32) {
        if self.params.content_scale == content_scale {
            return;
        }
        self.params.content_scale = content_scale;
        if let Some(effect) = self.effect() {
            info!(content_scale, "content scale changed, rebuilding background");
            self.switch_effect(effect);
        }
    }

    pub fn resize(&mut self, frame: Rect, shape: S) {
        self.params.frame = frame;
        self.shape = shape;
        if let Some(active) = self.active.as_mut() {
            active.resize(frame, &self.shape);
        }
    }

    /// Re-reads the silhouette after its geometry changed in place.
    pub fn configure(&mut self, shape: S) {
        self.shape = shape;
        if let Some(active) = self.active.as_mut() {
            active.configure(&self.shape);
        }
    }

    pub fn advance(&mut self, delta: f32) {
        if let Some(active) = self.active.as_mut() {
            active.advance(delta);
        }
    }

    /// Renders when the live background asked for it.
    pub fn render_if_needed(&mut self) -> Result<bool, GpuError> {
        match self.active.as_mut() {
            Some(active) if active.needs_redraw() => active.render(),
            _ => Ok(false),
        }
    }

    /// Writes the last rendered frame as PNG. Returns `false` when no device
    /// is attached.
    pub fn save_frame(&self, path: &Path) -> Result<bool> {
        let Some(active) = self.active.as_ref() else {
            return Ok(false);
        };
        let Some(image) = active.read_frame().context("failed to read back frame")? else {
            return Ok(false);
        };
        image
            .save(path)
            .with_context(|| format!("failed to write frame to {}", path.display()))?;
        debug!(path = %path.display(), "frame saved");
        Ok(true)
    }

    fn pick(&mut self, mode: EffectMode) -> BackgroundEffect {
        match mode {
            EffectMode::Specific(effect) => effect,
            EffectMode::Random => BackgroundEffect::ALL
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(BackgroundEffect::Rainbow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silhouette::LogoSilhouette;

    fn stage(mode: EffectMode) -> Stage<LogoSilhouette> {
        let frame = Rect::from_size(320.0, 240.0);
        Stage::new(
            mode,
            RendererParams::new(frame, 1.0),
            LogoSilhouette::new(frame, 1.0),
            BackgroundSettings {
                seed: 9,
                ..BackgroundSettings::default()
            },
            None,
        )
    }

    #[test]
    fn default_mode_is_rainbow() {
        assert_eq!(EffectMode::default(), EffectMode::Specific(BackgroundEffect::Rainbow));
        let stage = stage(EffectMode::default());
        assert_eq!(stage.effect(), Some(BackgroundEffect::Rainbow));
    }

    #[test]
    fn random_mode_is_reproducible_per_seed() {
        let first = stage(EffectMode::Random).effect();
        let second = stage(EffectMode::Random).effect();
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn shuffle_never_repeats_the_current_effect() {
        let mut stage = stage(EffectMode::Specific(BackgroundEffect::Warp));
        for _ in 0..20 {
            let before = stage.effect();
            let next = stage.shuffle();
            assert_ne!(Some(next), before);
            assert_eq!(stage.effect(), Some(next));
        }
    }

    #[test]
    fn content_scale_change_rebuilds_with_new_params() {
        let mut stage = stage(EffectMode::Specific(BackgroundEffect::Ocean));
        stage.set_content_scale(2.0);
        let background = stage.background().expect("background");
        assert_eq!(background.kind(), BackgroundEffect::Ocean);
        assert_eq!(background.params().content_scale, 2.0);
        assert_eq!(background.params().pixel_size(), (640, 480));
    }

    #[test]
    fn resize_reaches_the_background() {
        let mut stage = stage(EffectMode::Specific(BackgroundEffect::Solid));
        let frame = Rect::from_size(100.0, 80.0);
        stage.resize(frame, LogoSilhouette::new(frame, 1.0));
        assert_eq!(stage.background().expect("background").params().frame, frame);
        assert!(stage.render_if_needed().expect("render"));
        assert!(!stage.render_if_needed().expect("render"));
    }

    #[test]
    fn saving_without_a_device_writes_nothing() {
        let stage = stage(EffectMode::default());
        let path = std::env::temp_dir().join("fruitfarm-stage-no-device.png");
        assert!(!stage.save_frame(&path).expect("save"));
    }
}
