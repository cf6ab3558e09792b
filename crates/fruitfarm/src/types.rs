use std::fmt;

/// Axis-aligned rectangle in logical points with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    /// Grows (negative `dx`/`dy`) or shrinks the rectangle on every side.
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// One of the interchangeable animated backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundEffect {
    Solid,
    LinearGradient,
    CircularGradient,
    Rainbow,
    Liquid,
    Ocean,
    Psy,
    Puppy,
    Warp,
}

impl BackgroundEffect {
    /// Every effect in presentation order.
    pub const ALL: [BackgroundEffect; 9] = [
        BackgroundEffect::Rainbow,
        BackgroundEffect::Solid,
        BackgroundEffect::LinearGradient,
        BackgroundEffect::CircularGradient,
        BackgroundEffect::Liquid,
        BackgroundEffect::Ocean,
        BackgroundEffect::Psy,
        BackgroundEffect::Puppy,
        BackgroundEffect::Warp,
    ];

    /// Stable identifier used by configuration files and the CLI.
    pub fn id(self) -> &'static str {
        match self {
            BackgroundEffect::Solid => "solid",
            BackgroundEffect::LinearGradient => "linear-gradient",
            BackgroundEffect::CircularGradient => "circular-gradient",
            BackgroundEffect::Rainbow => "rainbow",
            BackgroundEffect::Liquid => "liquid",
            BackgroundEffect::Ocean => "ocean",
            BackgroundEffect::Psy => "psy",
            BackgroundEffect::Puppy => "puppy",
            BackgroundEffect::Warp => "warp",
        }
    }

    /// Human readable label.
    pub fn name(self) -> &'static str {
        match self {
            BackgroundEffect::Solid => "Solid",
            BackgroundEffect::LinearGradient => "Linear Gradient",
            BackgroundEffect::CircularGradient => "Circular Gradient",
            BackgroundEffect::Rainbow => "Rainbow",
            BackgroundEffect::Liquid => "Liquid",
            BackgroundEffect::Ocean => "Ocean",
            BackgroundEffect::Psy => "Psy",
            BackgroundEffect::Puppy => "Puppy",
            BackgroundEffect::Warp => "Warp",
        }
    }

    /// Parses an identifier, accepting `-`, `_` or no separator in any case.
    pub fn from_id(id: &str) -> Option<Self> {
        let normalized: String = id
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_' && *ch != ' ')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "solid" => Some(BackgroundEffect::Solid),
            "lineargradient" | "linear" => Some(BackgroundEffect::LinearGradient),
            "circulargradient" | "circular" => Some(BackgroundEffect::CircularGradient),
            "rainbow" | "rainbows" => Some(BackgroundEffect::Rainbow),
            "liquid" => Some(BackgroundEffect::Liquid),
            "ocean" => Some(BackgroundEffect::Ocean),
            "psy" => Some(BackgroundEffect::Psy),
            "puppy" => Some(BackgroundEffect::Puppy),
            "warp" => Some(BackgroundEffect::Warp),
            _ => None,
        }
    }
}

impl fmt::Display for BackgroundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Construction parameters that must be supplied together.
///
/// Changing `content_scale` after construction requires a new renderer; see
/// [`crate::Stage::set_content_scale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererParams {
    /// Host frame in logical points.
    pub frame: Rect,
    /// Pixels per logical point.
    pub content_scale: f32,
}

impl RendererParams {
    pub fn new(frame: Rect, content_scale: f32) -> Self {
        Self {
            frame,
            content_scale,
        }
    }

    /// Drawable size in physical pixels, never smaller than 1×1.
    pub fn pixel_size(&self) -> (u32, u32) {
        pixel_size(self.frame, self.content_scale)
    }
}

pub(crate) fn pixel_size(frame: Rect, content_scale: f32) -> (u32, u32) {
    let scale = if content_scale.is_finite() && content_scale > 0.0 {
        content_scale
    } else {
        1.0
    };
    let width = (frame.width.max(0.0) * scale).ceil() as u32;
    let height = (frame.height.max(0.0) * scale).ceil() as u32;
    (width.max(1), height.max(1))
}
