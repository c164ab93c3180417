//! Background color for the overlay.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse a color string as the host platforms do.
    ///
    /// Accepts `#RRGGBB`, `#AARRGGBB` (alpha first) with or without the
    /// leading `#`, and a small set of named colors. Returns `None` for
    /// anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let cleaned = value.trim();
        if cleaned.is_empty() {
            return None;
        }

        if let Some(named) = Self::named(cleaned) {
            return Some(named);
        }

        let hex = cleaned.strip_prefix('#').unwrap_or(cleaned);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let bits = u32::from_str_radix(hex, 16).ok()?;

        match hex.len() {
            6 => Some(Self::rgb((bits >> 16) as u8, (bits >> 8) as u8, bits as u8)),
            8 => Some(Self::rgba(
                (bits >> 16) as u8,
                (bits >> 8) as u8,
                bits as u8,
                (bits >> 24) as u8,
            )),
            _ => None,
        }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(136, 136, 136),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Formats as `#AARRGGBB`, the same layout [`Color::parse`] accepts.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}
