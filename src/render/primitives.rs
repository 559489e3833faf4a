use crate::core::ImageRef;
use crate::core::constants::{SHADOW_ALPHA, SHADOW_BLUR, SHADOW_OFFSET_X, SHADOW_OFFSET_Y};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#RRGGBB` only.
    #[must_use]
    pub fn parse_hex6(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Parses `#RGB` or `#RRGGBB`.
    #[must_use]
    pub fn parse_hex(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Some(color) = Self::parse_hex6(trimmed) {
            return Some(color);
        }
        let digits = trimmed.strip_prefix('#')?;
        if digits.len() != 3 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }
        let mut channels = digits.chars().map(|digit| {
            digit
                .to_digit(16)
                .and_then(|nibble| u8::try_from(nibble * 17).ok())
        });
        Some(Self::from_rgb8(
            channels.next()??,
            channels.next()??,
            channels.next()??,
        ))
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Light,
}

/// Font selection passed verbatim to the backend; no shaping happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
    pub weight: FontWeight,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            weight: FontWeight::Normal,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }
}

/// Drop shadow applied to every draw after it is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            offset_x: SHADOW_OFFSET_X,
            offset_y: SHADOW_OFFSET_Y,
            blur: SHADOW_BLUR,
            color: Color::rgba(0.0, 0.0, 0.0, SHADOW_ALPHA),
        }
    }
}

/// Solid rectangle fill in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "rect origin must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(ChartError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()
    }
}

/// Draws `image` stretched into the destination rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    pub image: ImageRef,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImagePrimitive {
    #[must_use]
    pub fn new(image: ImageRef, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            image,
            x,
            y,
            width,
            height,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "image destination must be finite".to_owned(),
            ));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ChartError::InvalidData(
                "image destination must have a positive size".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
}

/// Outline stroked around glyphs for legibility over arbitrary backgrounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOutline {
    pub width: f64,
    pub color: Color,
    /// Stroke before filling; otherwise the stroke is drawn over the fill.
    pub under_fill: bool,
}

/// One line of text; `y` is the alphabetic baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: FontSpec,
    pub color: Color,
    pub h_align: TextHAlign,
    pub outline: Option<TextOutline>,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font,
            color,
            h_align,
            outline: None,
        }
    }

    #[must_use]
    pub fn with_outline(mut self, outline: TextOutline) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if let Some(outline) = self.outline {
            if !outline.width.is_finite() || outline.width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "text outline width must be finite and > 0".to_owned(),
                ));
            }
            outline.color.validate()?;
        }
        self.color.validate()
    }
}

/// One ordered draw operation. Shadow state persists until replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect(RectPrimitive),
    Image(ImagePrimitive),
    SetShadow(Option<ShadowStyle>),
    Text(TextPrimitive),
}

impl DrawCommand {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::FillRect(rect) => rect.validate(),
            Self::Image(image) => image.validate(),
            Self::SetShadow(Some(shadow)) => shadow.color.validate(),
            Self::SetShadow(None) => Ok(()),
            Self::Text(text) => text.validate(),
        }
    }
}
