//! Colors, the 16-entry base palette and resolution of terminal color codes.
//!
//! Terminal models report colors abstractly ([`ColorCode`]); turning them into
//! concrete RGBA is done here against an injected [`ColorScheme`] so callers
//! (and tests) can substitute palettes freely.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color '{0}', expected #rrggbb")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#rrggbb` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A color as reported by a terminal model, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    /// Use the scheme's default foreground or background.
    Default,
    /// xterm 256-color index.
    Indexed(u8),
    /// Direct 24-bit color.
    Rgb(u8, u8, u8),
}

/// The 16 base colors (8 normal, 8 bright).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [Color; 16]);

impl Default for Palette {
    fn default() -> Self {
        Palette([
            Color::rgb(0, 0, 0),
            Color::rgb(205, 49, 49),
            Color::rgb(13, 188, 121),
            Color::rgb(229, 229, 16),
            Color::rgb(36, 114, 200),
            Color::rgb(188, 63, 188),
            Color::rgb(17, 168, 205),
            Color::rgb(229, 229, 229),
            Color::rgb(102, 102, 102),
            Color::rgb(241, 76, 76),
            Color::rgb(35, 209, 139),
            Color::rgb(245, 245, 67),
            Color::rgb(59, 142, 234),
            Color::rgb(214, 112, 214),
            Color::rgb(41, 184, 219),
            Color::rgb(255, 255, 255),
        ])
    }
}

impl Palette {
    /// Resolve an xterm 256-color index.
    ///
    /// 0..16 come from the palette, 16..232 from the 6x6x6 cube and
    /// 232..256 from the 24-step grayscale ramp.
    pub fn indexed(&self, index: u8) -> Color {
        match index {
            0..=15 => self.0[index as usize],
            16..=231 => {
                let i = index - 16;
                Color::rgb((i / 36) * 51, ((i / 6) % 6) * 51, (i % 6) * 51)
            }
            232..=255 => {
                let gray = (index - 232) * 10 + 8;
                Color::rgb(gray, gray, gray)
            }
        }
    }
}

/// Palette plus the default foreground and background of the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub palette: Palette,
    pub foreground: Color,
    pub background: Color,
}

impl ColorScheme {
    pub fn new(palette: Palette, foreground: Color, background: Color) -> Self {
        Self {
            palette,
            foreground,
            background,
        }
    }

    pub fn resolve_fg(&self, code: ColorCode) -> Color {
        self.resolve(code, self.foreground)
    }

    pub fn resolve_bg(&self, code: ColorCode) -> Color {
        self.resolve(code, self.background)
    }

    fn resolve(&self, code: ColorCode, default: Color) -> Color {
        match code {
            ColorCode::Default => default,
            ColorCode::Indexed(index) => self.palette.indexed(index),
            ColorCode::Rgb(r, g, b) => Color::rgb(r, g, b),
        }
    }
}
