use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fruitconfig::FruitConfig;
use fruitfarm::{
    BackgroundEffect, EffectMode, FixedStepClock, FrameClock, GpuContext, LogoSilhouette, Stage,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{CheckConfigArgs, EffectsArgs, RenderArgs};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn render(args: RenderArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => FruitConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FruitConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate().context("invalid render options")?;

    let mode = if args.random {
        EffectMode::Random
    } else if let Some(effect) = args.effect {
        EffectMode::Specific(effect)
    } else {
        config.effect_mode()
    };

    let params = config.display.renderer_params();
    let shape = LogoSilhouette::new(params.frame, config.display.logo_scale);
    let gpu = if args.no_gpu {
        info!("GPU disabled (--no-gpu)");
        None
    } else {
        match GpuContext::new(args.power.into()) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                warn!(%err, "no GPU device; continuing with the fallback background");
                None
            }
        }
    };

    let mut stage = Stage::new(mode, params, shape, config.background_settings(), gpu);
    let effect = stage.effect().unwrap_or(BackgroundEffect::Rainbow);
    let (pixel_width, pixel_height) = params.pixel_size();
    info!(
        %effect,
        width = pixel_width,
        height = pixel_height,
        frames = args.frames,
        "rendering"
    );

    let mut clock = FixedStepClock::from_fps(config.display.fps);
    let mut rendered = 0u32;
    let mut exported = 0u32;
    for index in 1..=args.frames {
        stage.advance(clock.tick());
        if stage.render_if_needed().context("frame submission failed")? {
            rendered += 1;
        }
        if let (Some(every), Some(out)) = (args.every, &args.out) {
            if every > 0 && index % every == 0 && stage.save_frame(&numbered_path(out, index))? {
                exported += 1;
            }
        }
    }

    if let (None, Some(out)) = (args.every, &args.out) {
        if stage.save_frame(out)? {
            exported += 1;
        }
    }
    if args.out.is_some() && exported == 0 {
        warn!("no frames were exported; a GPU device is required for read-back");
    }

    info!(
        rendered,
        exported,
        elapsed = clock.elapsed(),
        "render finished"
    );
    Ok(())
}

fn apply_overrides(config: &mut FruitConfig, args: &RenderArgs) {
    if let Some((width, height)) = args.size {
        config.display.width = width;
        config.display.height = height;
    }
    if let Some(scale) = args.scale {
        config.display.content_scale = scale;
    }
    if let Some(fps) = args.fps {
        config.display.fps = fps;
    }
    if let Some(seed) = args.seed {
        config.background.seed = seed;
    }
}

/// `out.png` becomes `out-00012.png` for frame 12.
fn numbered_path(out: &Path, index: u32) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let extension = out
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    out.with_file_name(format!("{stem}-{index:05}.{extension}"))
}

#[derive(Debug, Serialize)]
struct EffectEntry {
    id: &'static str,
    name: &'static str,
}

pub fn list_effects(args: EffectsArgs) -> Result<()> {
    let entries: Vec<EffectEntry> = BackgroundEffect::ALL
        .iter()
        .map(|effect| EffectEntry {
            id: effect.id(),
            name: effect.name(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{:<18} {}", entry.id, entry.name);
        }
    }
    Ok(())
}

pub fn check_config(args: CheckConfigArgs) -> Result<()> {
    let config = FruitConfig::load(&args.path)
        .with_context(|| format!("config {} is not valid", args.path.display()))?;
    let display = &config.display;
    let mode = match config.effect_mode() {
        EffectMode::Specific(effect) => effect.id().to_string(),
        EffectMode::Random => "random".to_string(),
    };
    println!(
        "{}: ok (effect {mode}, {}x{} @ {}x, {} fps)",
        args.path.display(),
        display.width,
        display.height,
        display.content_scale,
        display.fps
    );
    Ok(())
}
