use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fruitfarm::{BackgroundEffect, GpuPowerPreference};

#[derive(Parser, Debug)]
#[command(
    name = "fruitshop",
    author,
    version,
    about = "Headless renderer for the animated logo backgrounds"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive a background for a number of frames and export PNGs.
    Render(RenderArgs),
    /// List the available effects.
    Effects(EffectsArgs),
    /// Parse and validate a configuration file.
    CheckConfig(CheckConfigArgs),
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Effect id (e.g. `warp`, `linear-gradient`); overrides the config.
    #[arg(long, value_name = "ID", value_parser = parse_effect, conflicts_with = "random")]
    pub effect: Option<BackgroundEffect>,

    /// Pick a random effect using the configured seed.
    #[arg(long)]
    pub random: bool,

    /// Frame size in logical points (e.g. `640x400`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(f32, f32)>,

    /// Pixels per logical point.
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<f32>,

    /// Seed for effect selection and speed phases.
    #[arg(long, value_name = "N", env = "FRUITSHOP_SEED")]
    pub seed: Option<u64>,

    /// Number of host ticks to simulate.
    #[arg(long, value_name = "N", default_value_t = 120)]
    pub frames: u32,

    /// Host tick rate; overrides the config.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// PNG path for the exported frame.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Export every Nth frame, suffixing `--out` with the frame number.
    #[arg(long, value_name = "N", requires = "out")]
    pub every: Option<u32>,

    /// Adapter preference: `low` or `high`.
    #[arg(long, value_enum, default_value_t = PowerArg::Low)]
    pub power: PowerArg,

    /// Skip GPU acquisition and run the animation on the CPU only.
    #[arg(long)]
    pub no_gpu: bool,
}

#[derive(Parser, Debug)]
pub struct EffectsArgs {
    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct CheckConfigArgs {
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    Low,
    High,
}

impl From<PowerArg> for GpuPowerPreference {
    fn from(value: PowerArg) -> Self {
        match value {
            PowerArg::Low => GpuPowerPreference::Low,
            PowerArg::High => GpuPowerPreference::High,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_effect(value: &str) -> Result<BackgroundEffect, String> {
    BackgroundEffect::from_id(value).ok_or_else(|| {
        let known: Vec<&str> = BackgroundEffect::ALL
            .iter()
            .map(|effect| effect.id())
            .collect();
        format!("unknown effect '{}'; expected one of {}", value.trim(), known.join(", "))
    })
}

pub fn parse_size(value: &str) -> Result<(f32, f32), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("size must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    let (width, height) = normalized
        .split_once('x')
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let parse_side = |side: &str| -> Result<f32, String> {
        let parsed: f32 = side
            .trim()
            .parse()
            .map_err(|_| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
        if !(parsed.is_finite() && parsed > 0.0) {
            return Err(format!("size '{trimmed}' must be positive in both dimensions"));
        }
        Ok(parsed)
    };

    Ok((parse_side(width)?, parse_side(height)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("640x400"), Ok((640.0, 400.0)));
        assert_eq!(parse_size(" 800X600 "), Ok((800.0, 600.0)));
        assert_eq!(parse_size("320.5x200"), Ok((320.5, 200.0)));
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(parse_size("").is_err());
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x400").is_err());
        assert!(parse_size("-1x400").is_err());
        assert!(parse_size("wide x tall").is_err());
    }

    #[test]
    fn parses_effect_ids() {
        assert_eq!(parse_effect("Circular_Gradient"), Ok(BackgroundEffect::CircularGradient));
        let err = parse_effect("lava").unwrap_err();
        assert!(err.contains("warp"));
    }

    #[test]
    fn render_arguments_parse() {
        let cli = Cli::try_parse_from([
            "fruitshop", "render", "--effect", "warp", "--size", "300x200", "--frames", "4",
            "--out", "frame.png", "--every", "2",
        ])
        .expect("parse");
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.effect, Some(BackgroundEffect::Warp));
        assert_eq!(args.size, Some((300.0, 200.0)));
        assert_eq!(args.frames, 4);
        assert_eq!(args.every, Some(2));
        assert_eq!(args.power, PowerArg::Low);
    }

    #[test]
    fn every_requires_out() {
        assert!(Cli::try_parse_from(["fruitshop", "render", "--every", "2"]).is_err());
    }
}
