//! Background fill color.
//!
//! Every transform that has to synthesize pixels (pad borders, crop
//! backfill, blank canvases) takes its color from here. Default is white.

use crate::error::{CanvasError, Result};
use image::Rgb;

/// RGB fill color used wherever a transform must synthesize background
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Background {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS-style hex color: `#rrggbb` or the short `#rgb` form,
    /// leading `#` optional. The short form doubles each nibble
    /// (`#f3a` → `#ff33aa`).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => {
                return Err(CanvasError::Configuration(format!(
                    "hex color must be 3 or 6 digits, got {hex:?}"
                )));
            }
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map_err(|_| {
                CanvasError::Configuration(format!("invalid hex color {hex:?}"))
            })
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new(255, 255, 255)
    }
}
