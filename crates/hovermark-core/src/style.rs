use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// RGBA color with 8 bits per channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color `{0}` must start with `#`")]
    MissingHash(String),
    #[error("color `{0}` must have 3, 6 or 8 hex digits")]
    InvalidLength(String),
    #[error("color `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Err(ColorParseError::MissingHash(value.to_string()));
        };
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(value.to_string()));
        }
        let channel = |idx: usize| -> u8 {
            // Digits validated above.
            u8::from_str_radix(&hex[idx..idx + 2], 16).unwrap_or(0)
        };
        match hex.len() {
            3 => {
                let short = |idx: usize| -> u8 {
                    let digit = u8::from_str_radix(&hex[idx..idx + 1], 16).unwrap_or(0);
                    digit * 0x11
                };
                Ok(Color::rgb(short(0), short(1), short(2)))
            }
            6 => Ok(Color::rgb(channel(0), channel(2), channel(4))),
            8 => Ok(Color::rgba(channel(0), channel(2), channel(4), channel(6))),
            _ => Err(ColorParseError::InvalidLength(value.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Name of the monospace typeface the host should resolve.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontHandle(pub String);

impl FontHandle {
    pub fn new(family: impl Into<String>) -> Self {
        Self(family.into())
    }

    pub fn family(&self) -> &str {
        &self.0
    }
}

impl Default for FontHandle {
    fn default() -> Self {
        Self::new("monospace")
    }
}

pub const DEFAULT_HEADING_SCALE: [f32; 6] = [1.6, 1.4, 1.25, 1.1, 1.0, 0.9];

/// Per-call styling inputs of the builder. Read-only during a render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub bold_color: Color,
    pub inline_code_color: Color,
    pub block_code_color: Color,
    pub monospace: FontHandle,
    pub link_color: Option<Color>,
    pub heading_scale: Vec<f32>,
}

impl StyleConfig {
    /// Relative size for a heading level; levels past the end of the scale
    /// reuse its last entry.
    pub fn heading_scale(&self, level: u8) -> f32 {
        let index = usize::from(level.max(1)) - 1;
        match self.heading_scale.get(index) {
            Some(scale) => *scale,
            None => self.heading_scale.last().copied().unwrap_or(1.0),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bold_color: Color::rgb(0x1f, 0x23, 0x28),
            inline_code_color: Color::rgb(0xa3, 0x3a, 0x2c),
            block_code_color: Color::rgb(0x2b, 0x6c, 0xb0),
            monospace: FontHandle::default(),
            link_color: Some(Color::rgb(0x1a, 0x4f, 0x8b)),
            heading_scale: DEFAULT_HEADING_SCALE.to_vec(),
        }
    }
}
