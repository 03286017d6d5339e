//! RGBA color with CSS-style hex interchange.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// RGBA color, each channel in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Parse a hex color string (with or without `#` prefix).
    ///
    /// Accepts `rrggbb` and `rrggbbaa` forms; anything else is rejected with
    /// the offending input echoed back in the error.
    pub fn from_hex(value: &str) -> EngineResult<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);

        let bytes = hex::decode(digits).map_err(|e| EngineError::ColorParse {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

        match bytes.as_slice() {
            [r, g, b] => Ok(Self::rgb(channel(*r), channel(*g), channel(*b))),
            [r, g, b, a] => Ok(Self::rgba(
                channel(*r),
                channel(*g),
                channel(*b),
                channel(*a),
            )),
            _ => Err(EngineError::ColorParse {
                value: value.to_string(),
                reason: format!("expected 6 or 8 hex digits, got {}", digits.len()),
            }),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when the color is not fully opaque.
    pub fn to_hex(&self) -> String {
        let rgb = [byte(self.r), byte(self.g), byte(self.b)];
        if self.a >= 1.0 {
            format!("#{}", hex::encode(rgb))
        } else {
            format!("#{}{}", hex::encode(rgb), hex::encode([byte(self.a)]))
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

fn channel(byte: u8) -> f32 {
    f32::from(byte) / 255.0
}

fn byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_with_prefix() {
        let c = Color::from_hex("#ff8040").unwrap();
        assert_eq!(c.to_hex(), "#ff8040");
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_from_hex_without_prefix() {
        let c = Color::from_hex("102030").unwrap();
        assert_eq!(c.to_hex(), "#102030");
    }

    #[test]
    fn test_from_hex_with_alpha() {
        let c = Color::from_hex("#10203080").unwrap();
        assert!(c.a < 1.0);
        assert_eq!(c.to_hex(), "#10203080");
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#1234").is_err());
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#ff00112233").is_err());
    }

    #[test]
    fn test_roundtrip_preserves_channels() {
        for hex in ["#000000", "#ffffff", "#0a141e", "#ff00ff7f"] {
            let c = Color::from_hex(hex).unwrap();
            assert_eq!(c.to_hex(), hex);
        }
    }

    #[test]
    fn test_default_is_opaque_white() {
        assert_eq!(Color::default().to_hex(), "#ffffff");
    }
}
