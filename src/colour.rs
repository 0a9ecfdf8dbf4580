use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A colour, expressed in RGB, CMYK, or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

/// A colour string could not be parsed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid colour value {0:?}, expected #RRGGBB or #RGB")]
pub struct ParseColourError(pub String);

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0 to 255
    pub fn new_grey_bytes(g: u8) -> Colour {
        Colour::Grey {
            g: g as f32 / 255.0,
        }
    }

    /// Parse a CSS-style hex colour (`#2A5CAA`, `2a5caa`, or the short `#FA0` form)
    pub fn from_hex(value: &str) -> Result<Colour, ParseColourError> {
        let err = || ParseColourError(value.to_string());
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Colour::new_rgb_bytes(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Colour::new_rgb_bytes(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(err()),
        }
    }

    /// Components in the RGB space, converting from CMYK or grey if needed
    pub fn to_rgb(self) -> (f32, f32, f32) {
        match self {
            Colour::RGB { r, g, b } => (r, g, b),
            Colour::CMYK { c, m, y, k } => (
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            ),
            Colour::Grey { g } => (g, g, g),
        }
    }

    /// Upper-case `#RRGGBB` representation, as printed under swatches
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb();
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(r), byte(g), byte(b))
    }

    /// Relative luminance in `0.0..=1.0`
    pub fn luminance(self) -> f32 {
        let (r, g, b) = self.to_rgb();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Very light colours disappear against white paper and get an outline
    pub fn needs_outline(self) -> bool {
        self.luminance() > 0.85
    }
}

impl TryFrom<String> for Colour {
    type Error = ParseColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.to_hex()
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// `#333333`, body copy
    pub const TEXT: Colour = Colour::Grey { g: 0.2 };
    /// `#666666`, footers and tertiary headings
    pub const MUTED: Colour = Colour::Grey { g: 0.4 };
    /// `#CCCCCC`, separator rules and preview frames
    pub const RULE: Colour = Colour::Grey { g: 0.8 };
}
