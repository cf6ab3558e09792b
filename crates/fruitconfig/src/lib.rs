use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fruitfarm::{
    BackgroundEffect, BackgroundSettings, CycleSettings, EffectMode, PhaseRange, RainbowSettings,
    Rect, RendererParams, SpeedPhaseRanges,
};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    #[default]
    Specific,
    Random,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FruitConfig {
    pub version: u32,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_scale")]
    pub content_scale: f32,
    #[serde(default = "default_fps")]
    pub fps: f32,
    #[serde(default = "default_scale")]
    pub logo_scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            content_scale: default_scale(),
            fps: default_fps(),
            logo_scale: default_scale(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default)]
    pub mode: ModeSetting,
    pub effect: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub redraw_interval: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EffectsConfig {
    pub solid: Option<CycleConfig>,
    pub linear_gradient: Option<CycleConfig>,
    pub circular_gradient: Option<CycleConfig>,
    pub liquid: Option<CycleConfig>,
    pub rainbow: Option<RainbowConfig>,
    pub psy: Option<SpeedPhaseConfig>,
    pub warp: Option<SpeedPhaseConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CycleConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub seconds_per_color: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RainbowConfig {
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub seconds_per_color: Option<Duration>,
    pub scroll_speed: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeedPhaseConfig {
    pub fast: Option<PhaseRangeConfig>,
    pub slow: Option<PhaseRangeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhaseRangeConfig {
    pub speed: [f32; 2],
    pub duration: [DurationValue; 2],
}

/// A single duration in seconds or humantime form, usable inside arrays.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DurationValue(#[serde(deserialize_with = "deserialize_duration")] pub Duration);

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

fn default_scale() -> f32 {
    2.0
}

fn default_fps() -> f32 {
    60.0
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration_opt(deserializer)?
        .ok_or_else(|| de::Error::custom("a duration is required"))
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs_f64(v)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl Default for FruitConfig {
    fn default() -> Self {
        Self {
            version: 1,
            display: DisplayConfig::default(),
            background: BackgroundConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl FruitConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: FruitConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        let display = &self.display;
        for (name, value) in [
            ("width", display.width),
            ("height", display.height),
            ("content_scale", display.content_scale),
            ("fps", display.fps),
            ("logo_scale", display.logo_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "display.{name} must be greater than zero"
                )));
            }
        }

        if let Some(id) = &self.background.effect {
            if BackgroundEffect::from_id(id).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "background.effect '{id}' is not a known effect"
                )));
            }
        }

        if let Some(interval) = self.background.redraw_interval {
            if interval.is_zero() {
                return Err(ConfigError::Invalid(
                    "background.redraw_interval must be greater than zero".into(),
                ));
            }
        }

        let effects = &self.effects;
        for (name, cycle) in [
            ("solid", &effects.solid),
            ("linear_gradient", &effects.linear_gradient),
            ("circular_gradient", &effects.circular_gradient),
            ("liquid", &effects.liquid),
        ] {
            if let Some(cycle) = cycle {
                if cycle.seconds_per_color.is_zero() {
                    return Err(ConfigError::Invalid(format!(
                        "effects.{name}.seconds_per_color must be greater than zero"
                    )));
                }
            }
        }

        if let Some(rainbow) = &effects.rainbow {
            if rainbow.seconds_per_color.is_some_and(|value| value.is_zero()) {
                return Err(ConfigError::Invalid(
                    "effects.rainbow.seconds_per_color must be greater than zero".into(),
                ));
            }
            if let Some(speed) = rainbow.scroll_speed {
                if !(speed.is_finite() && speed >= 0.0) {
                    return Err(ConfigError::Invalid(
                        "effects.rainbow.scroll_speed must be >= 0".into(),
                    ));
                }
            }
        }

        for (name, phases) in [("psy", &effects.psy), ("warp", &effects.warp)] {
            let Some(phases) = phases else {
                continue;
            };
            for (phase, range) in [("fast", &phases.fast), ("slow", &phases.slow)] {
                if let Some(range) = range {
                    validate_phase_range(&format!("effects.{name}.{phase}"), range)?;
                }
            }
        }

        Ok(())
    }

    pub fn effect_mode(&self) -> EffectMode {
        match self.background.mode {
            ModeSetting::Random => EffectMode::Random,
            ModeSetting::Specific => self
                .background
                .effect
                .as_deref()
                .and_then(BackgroundEffect::from_id)
                .map(EffectMode::Specific)
                .unwrap_or_default(),
        }
    }

    /// Engine tuning with every configured override applied.
    pub fn background_settings(&self) -> BackgroundSettings {
        let mut settings = BackgroundSettings {
            seed: self.background.seed,
            ..BackgroundSettings::default()
        };
        if let Some(interval) = self.background.redraw_interval {
            settings.redraw_interval = interval.as_secs_f32();
        }

        let effects = &self.effects;
        let cycle = |config: &Option<CycleConfig>, fallback: CycleSettings| {
            config
                .as_ref()
                .map(|config| CycleSettings::new(config.seconds_per_color.as_secs_f32()))
                .unwrap_or(fallback)
        };
        settings.solid = cycle(&effects.solid, settings.solid);
        settings.linear_gradient = cycle(&effects.linear_gradient, settings.linear_gradient);
        settings.circular_gradient = cycle(&effects.circular_gradient, settings.circular_gradient);
        settings.liquid = cycle(&effects.liquid, settings.liquid);

        if let Some(rainbow) = &effects.rainbow {
            let defaults = RainbowSettings::default();
            settings.rainbow = RainbowSettings {
                seconds_per_color: rainbow
                    .seconds_per_color
                    .map_or(defaults.seconds_per_color, |value| value.as_secs_f32()),
                scroll_speed: rainbow.scroll_speed.unwrap_or(defaults.scroll_speed),
            };
        }
        if let Some(psy) = &effects.psy {
            settings.psy = psy.apply(settings.psy);
        }
        if let Some(warp) = &effects.warp {
            settings.warp = warp.apply(settings.warp);
        }
        settings
    }
}

impl DisplayConfig {
    /// Frame anchored at the origin, in logical points.
    pub fn frame(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    pub fn renderer_params(&self) -> RendererParams {
        RendererParams::new(self.frame(), self.content_scale)
    }
}

impl SpeedPhaseConfig {
    fn apply(&self, mut ranges: SpeedPhaseRanges) -> SpeedPhaseRanges {
        if let Some(fast) = &self.fast {
            ranges.fast = fast.to_range();
        }
        if let Some(slow) = &self.slow {
            ranges.slow = slow.to_range();
        }
        ranges
    }
}

impl PhaseRangeConfig {
    pub fn to_range(&self) -> PhaseRange {
        let [DurationValue(low), DurationValue(high)] = self.duration;
        PhaseRange::new(
            (self.speed[0], self.speed[1]),
            (low.as_secs_f32(), high.as_secs_f32()),
        )
    }
}

fn validate_phase_range(name: &str, range: &PhaseRangeConfig) -> Result<(), ConfigError> {
    let [low, high] = range.speed;
    if !(low.is_finite() && high.is_finite()) || low < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{name}.speed must be finite and non-negative"
        )));
    }
    if low > high {
        return Err(ConfigError::Invalid(format!(
            "{name}.speed minimum {low} exceeds maximum {high}"
        )));
    }

    let [DurationValue(shortest), DurationValue(longest)] = range.duration;
    if shortest.is_zero() {
        return Err(ConfigError::Invalid(format!(
            "{name}.duration must be greater than zero"
        )));
    }
    if shortest > longest {
        return Err(ConfigError::Invalid(format!(
            "{name}.duration minimum exceeds maximum"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[display]
width = 1280
height = 800
content_scale = 2.0
fps = 60
logo_scale = 2.0

[background]
mode = "specific"
effect = "warp"
seed = 7
redraw_interval = "50ms"

[effects.solid]
seconds_per_color = "4s"

[effects.rainbow]
scroll_speed = 6.0

[effects.warp.fast]
speed = [8.0, 14.0]
duration = ["15s", 30]
"#;

    #[test]
    fn parses_sample_config() {
        let config = FruitConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.display.frame(), Rect::from_size(1280.0, 800.0));
        assert_eq!(config.effect_mode(), EffectMode::Specific(BackgroundEffect::Warp));
        assert_eq!(config.background.seed, 7);
    }

    #[test]
    fn overrides_flow_into_engine_settings() {
        let config = FruitConfig::from_toml_str(SAMPLE).expect("parse config");
        let settings = config.background_settings();
        assert_eq!(settings.seed, 7);
        assert!((settings.redraw_interval - 0.05).abs() < 1e-6);
        assert_eq!(settings.solid.seconds_per_color, 4.0);
        assert_eq!(settings.rainbow.scroll_speed, 6.0);
        assert_eq!(settings.rainbow.seconds_per_color, 10.0);
        assert_eq!(settings.warp.fast, PhaseRange::new((8.0, 14.0), (15.0, 30.0)));
        assert_eq!(settings.warp.slow, SpeedPhaseRanges::WARP.slow);
        assert_eq!(settings.psy, SpeedPhaseRanges::PSY);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = FruitConfig::from_toml_str("version = 1").expect("parse config");
        assert_eq!(config.effect_mode(), EffectMode::default());
        assert_eq!(config.display.renderer_params().content_scale, 2.0);
        assert_eq!(config.background_settings(), BackgroundSettings::default());
    }

    #[test]
    fn random_mode_ignores_effect() {
        let config = FruitConfig::from_toml_str(
            r#"
version = 1

[background]
mode = "random"
effect = "psy"
"#,
        )
        .expect("parse config");
        assert_eq!(config.effect_mode(), EffectMode::Random);
    }

    #[test]
    fn rejects_unknown_effect() {
        let err = FruitConfig::from_toml_str(
            r#"
version = 1

[background]
effect = "lava-lamp"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = FruitConfig::from_toml_str(
            r#"
version = 1

[effects.psy.slow]
speed = [0.3, 0.1]
duration = ["20s", "40s"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_version_and_geometry() {
        let err = FruitConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = FruitConfig::from_toml_str(
            r#"
version = 1

[display]
width = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_durations() {
        let err = FruitConfig::from_toml_str(
            r#"
version = 1

[effects.liquid]
seconds_per_color = "soon"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
