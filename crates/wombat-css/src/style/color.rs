//! CSS color values.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Construct a fully opaque color from its channels.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value
    /// consists of 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit
            // form (#RRGGBB) by replicating digits, not by adding zeros."
            3 => Some(Self::opaque(digit(0)?, digit(1)?, digit(2)?)),
            4 => Some(Self {
                r: digit(0)?,
                g: digit(1)?,
                b: digit(2)?,
                a: digit(3)?,
            }),
            6 => Some(Self::opaque(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: pair(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The basic 16 HTML colors plus a few common extended names the UA
    /// stylesheet and tests rely on.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "gray" | "grey" => (128, 128, 128),
            "silver" => (192, 192, 192),
            "maroon" => (128, 0, 0),
            "olive" => (128, 128, 0),
            "lime" => (0, 255, 0),
            "aqua" | "cyan" => (0, 255, 255),
            "teal" => (0, 128, 128),
            "navy" => (0, 0, 128),
            "fuchsia" | "magenta" => (255, 0, 255),
            "purple" => (128, 0, 128),
            "orange" => (255, 165, 0),
            "transparent" => return Some(Self { r: 0, g: 0, b: 0, a: 0 }),
            _ => return None,
        };
        Some(Self::opaque(r, g, b))
    }

    /// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
    ///
    /// "Values outside these ranges are not invalid, but are clamped to the
    /// ranges defined here at parsed-value time."
    ///
    /// Channels are 0-255 numbers; alpha is a 0-1 number, `None` meaning
    /// fully opaque.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rgb_channels(r: f64, g: f64, b: f64, alpha: Option<f64>) -> Self {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: alpha.map_or(255, |a| channel(a * 255.0)),
        }
    }

    /// Convert to hex string notation (#RRGGBB, or #RRGGBBAA if alpha != 255).
    ///
    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    #[must_use]
    pub fn to_hex_string(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_short_form_replicates_digits() {
        assert_eq!(ColorValue::from_hex("#f0a"), ColorValue::from_hex("#ff00aa"));
    }

    #[test]
    fn hex_rejects_bad_lengths() {
        assert_eq!(ColorValue::from_hex("#ff00a"), None);
        assert_eq!(ColorValue::from_hex(""), None);
    }

    #[test]
    fn named_colors_match_css_values() {
        assert_eq!(ColorValue::from_named("green"), Some(ColorValue::opaque(0, 128, 0)));
        assert_eq!(ColorValue::from_named("LIME"), Some(ColorValue::opaque(0, 255, 0)));
        assert_eq!(ColorValue::from_named("chartreuse-ish"), None);
    }

    #[test]
    fn hex_string_notation_round_trips() {
        assert_eq!(ColorValue::WHITE.to_hex_string(), "#ffffff");
        assert_eq!(ColorValue::from_hex("#ffffff"), Some(ColorValue::WHITE));
        // Alpha is only written when not fully opaque.
        let translucent = ColorValue { r: 18, g: 52, b: 86, a: 128 };
        assert_eq!(translucent.to_hex_string(), "#12345680");
        assert_eq!(ColorValue::from_hex("12345680"), Some(translucent));
    }

    #[test]
    fn rgb_channels_clamp() {
        let c = ColorValue::from_rgb_channels(300.0, -5.0, 128.0, Some(0.5));
        assert_eq!(c, ColorValue { r: 255, g: 0, b: 128, a: 128 });
    }
}
