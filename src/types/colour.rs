//! Light colour type and parsing.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::{SlothError, Result};

/// An RGB light colour used to tint light emitting shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightColour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LightColour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White, the default light colour.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a colour token.
    ///
    /// Only exactly six lowercase hexadecimal digits are accepted
    /// (`ff8000`); no `#` prefix, no shorthand, no uppercase.
    pub fn from_hex(s: &str) -> Result<Self> {
        let valid = s.len() == 6
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if !valid {
            return Err(SlothError::Config {
                message: format!("Not a valid colour: {}", s),
                help: Some("Colours are six lowercase hex digits, e.g. ff8000".to_string()),
            });
        }

        let byte = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| SlothError::Config {
                message: format!("Not a valid colour: {}", s),
                help: None,
            })
        };

        Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Channels normalized to the 0-1 range.
    pub fn to_unit(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format::<f32>()
    }

    /// Check if the colour is pure white.
    pub fn is_white(self) -> bool {
        self == Self::WHITE
    }
}

impl FromStr for LightColour {
    type Err = SlothError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for LightColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Split a `name:colour` token into its parts.
pub fn parse_named_colour(token: &str) -> Result<(String, LightColour)> {
    let (name, colour) = token.split_once(':').ok_or_else(|| SlothError::Config {
        message: format!("Expected NAME:COLOR, got '{}'", token),
        help: Some("Name light colours like red:ff0000".to_string()),
    })?;

    if name.is_empty() {
        return Err(SlothError::Config {
            message: format!("Missing colour name in '{}'", token),
            help: None,
        });
    }

    Ok((name.to_string(), LightColour::from_hex(colour)?))
}
