//! Opaque RGB colors parsed from the CSS-style strings used by species data.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Opaque RGB color assigned to leaves, petals and flower centers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Adds `delta` to every channel and clamps the result to `0..=ceiling`.
    #[must_use]
    pub fn shifted(self, delta: i16, ceiling: u8) -> Self {
        let shift = |channel: u8| -> u8 {
            let value = (i16::from(channel) + delta).clamp(0, i16::from(ceiling));
            u8::try_from(value).unwrap_or(ceiling)
        };

        Self {
            red: shift(self.red),
            green: shift(self.green),
            blue: shift(self.blue),
        }
    }

    /// Parses `value`, returning `fallback` when the string is not understood.
    #[must_use]
    pub fn parse_or(value: &str, fallback: Color) -> Self {
        value.parse().unwrap_or(fallback)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Reasons a color string could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The string was empty or contained only whitespace.
    #[error("color string is empty")]
    Empty,
    /// The string is not a known color name.
    #[error("unknown color name `{0}`")]
    UnknownName(String),
    /// The string looked like a hex or functional color but was malformed.
    #[error("malformed color `{0}`")]
    Malformed(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::Malformed(trimmed.to_owned()));
        }

        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("rgb") {
            return parse_functional(&lowered)
                .ok_or_else(|| ColorParseError::Malformed(trimmed.to_owned()));
        }

        let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == compact)
            .map(|(_, color)| *color)
            .ok_or(ColorParseError::UnknownName(lowered))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |index: usize| -> Option<u8> {
        let c = hex.chars().nth(index)?;
        u8::try_from(c.to_digit(16)?).ok()
    };

    match hex.len() {
        3 => Some(Color::from_rgb(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 => Some(Color::from_rgb(
            digit(0)? * 16 + digit(1)?,
            digit(2)? * 16 + digit(3)?,
            digit(4)? * 16 + digit(5)?,
        )),
        _ => None,
    }
}

/// Parses `rgb(r, g, b)` and `rgba(r, g, b, a)`; alpha is accepted and dropped.
fn parse_functional(value: &str) -> Option<Color> {
    let start = value.find('(')?;
    let end = value.find(')')?;
    if end <= start {
        return None;
    }

    let channels: Vec<&str> = value[start + 1..end].split(',').map(str::trim).collect();
    if channels.len() < 3 || channels.len() > 4 {
        return None;
    }

    let channel = |raw: &str| -> Option<u8> {
        let parsed: f64 = raw.parse().ok()?;
        if !parsed.is_finite() {
            return None;
        }
        u8::try_from(parsed.round().clamp(0.0, 255.0) as u32).ok()
    };

    Some(Color::from_rgb(
        channel(channels[0])?,
        channel(channels[1])?,
        channel(channels[2])?,
    ))
}

const NAMED_COLORS: [(&str, Color); 40] = [
    ("aqua", Color::from_rgb(0, 255, 255)),
    ("black", Color::from_rgb(0, 0, 0)),
    ("blue", Color::from_rgb(0, 0, 255)),
    ("brown", Color::from_rgb(165, 42, 42)),
    ("coral", Color::from_rgb(255, 127, 80)),
    ("crimson", Color::from_rgb(220, 20, 60)),
    ("cyan", Color::from_rgb(0, 255, 255)),
    ("darkgreen", Color::from_rgb(0, 100, 0)),
    ("forestgreen", Color::from_rgb(34, 139, 34)),
    ("fuchsia", Color::from_rgb(255, 0, 255)),
    ("gold", Color::from_rgb(255, 215, 0)),
    ("gray", Color::from_rgb(128, 128, 128)),
    ("green", Color::from_rgb(0, 128, 0)),
    ("grey", Color::from_rgb(128, 128, 128)),
    ("indigo", Color::from_rgb(75, 0, 130)),
    ("lavender", Color::from_rgb(230, 230, 250)),
    ("lime", Color::from_rgb(0, 255, 0)),
    ("magenta", Color::from_rgb(255, 0, 255)),
    ("maroon", Color::from_rgb(128, 0, 0)),
    ("navy", Color::from_rgb(0, 0, 128)),
    ("olive", Color::from_rgb(128, 128, 0)),
    ("orange", Color::from_rgb(255, 165, 0)),
    ("orangered", Color::from_rgb(255, 69, 0)),
    ("orchid", Color::from_rgb(218, 112, 214)),
    ("palevioletred", Color::from_rgb(219, 112, 147)),
    ("pink", Color::from_rgb(255, 192, 203)),
    ("plum", Color::from_rgb(221, 160, 221)),
    ("purple", Color::from_rgb(128, 0, 128)),
    ("red", Color::from_rgb(255, 0, 0)),
    ("salmon", Color::from_rgb(250, 128, 114)),
    ("seagreen", Color::from_rgb(46, 139, 87)),
    ("silver", Color::from_rgb(192, 192, 192)),
    ("tan", Color::from_rgb(210, 180, 140)),
    ("teal", Color::from_rgb(0, 128, 128)),
    ("tomato", Color::from_rgb(255, 99, 71)),
    ("violet", Color::from_rgb(238, 130, 238)),
    ("white", Color::from_rgb(255, 255, 255)),
    ("yellow", Color::from_rgb(255, 255, 0)),
    ("yellowgreen", Color::from_rgb(154, 205, 50)),
    ("olivedrab", Color::from_rgb(107, 142, 35)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Green".parse::<Color>(), Ok(Color::from_rgb(0, 128, 0)));
        assert_eq!("sea green".parse::<Color>(), Ok(Color::from_rgb(46, 139, 87)));
    }

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color::from_rgb(255, 128, 0)));
        assert_eq!("#0f0".parse::<Color>(), Ok(Color::from_rgb(0, 255, 0)));
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn parses_functional_forms_and_drops_alpha() {
        assert_eq!(
            "rgba(10, 20, 30, 1)".parse::<Color>(),
            Ok(Color::from_rgb(10, 20, 30))
        );
        assert_eq!("rgb(300,0,0)".parse::<Color>(), Ok(Color::from_rgb(255, 0, 0)));
        assert!("rgb(1, 2)".parse::<Color>().is_err());
    }

    #[test]
    fn unknown_names_fall_back() {
        let fallback = Color::from_rgb(1, 2, 3);
        assert_eq!(Color::parse_or("chartreuse-ish", fallback), fallback);
        assert_eq!(Color::parse_or("", fallback), fallback);
    }

    #[test]
    fn shifted_clamps_to_ceiling_and_floor() {
        let color = Color::from_rgb(210, 10, 100);
        assert_eq!(color.shifted(30, 220), Color::from_rgb(220, 40, 130));
        assert_eq!(color.shifted(-30, 220), Color::from_rgb(180, 0, 70));
    }

    #[test]
    fn displays_as_css_rgb() {
        assert_eq!(Color::from_rgb(1, 2, 3).to_string(), "rgb(1, 2, 3)");
    }
}
