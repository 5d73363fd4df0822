use std::fmt;
use std::str::FromStr;

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Returns the color with its alpha channel scaled by `alpha` (0.0-1.0).
    pub fn scale_alpha(self, alpha: f32) -> Self {
        let scaled = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a: scaled, ..self }
    }

    /// Source-over composite of `self` onto `dst`.
    pub fn over(self, dst: Color) -> Color {
        if self.a == 255 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }

        let src_a = self.a as f32 / 255.0;
        let dst_a = dst.a as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= f32::EPSILON {
            return Color::TRANSPARENT;
        }

        let blend = |s: u8, d: u8| -> u8 {
            let value = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };

        Color {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a: (out_a * 255.0).round() as u8,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised color '{0}'")]
pub struct ParseColorError(String);

const NAMED_COLORS: &[(&str, Color)] = &[
    ("transparent", Color::TRANSPARENT),
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("red", Color::rgb(255, 0, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("aqua", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("fuchsia", Color::rgb(255, 0, 255)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("silver", Color::rgb(192, 192, 192)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("olive", Color::rgb(128, 128, 0)),
    ("navy", Color::rgb(0, 0, 128)),
    ("purple", Color::rgb(128, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("orange", Color::rgb(255, 165, 0)),
    ("pink", Color::rgb(255, 192, 203)),
    ("brown", Color::rgb(165, 42, 42)),
];

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts CSS named colors, hex notation (`#rgb`, `#rgba`, `#rrggbb`,
    /// `#rrggbbaa`) and `rgb()`/`rgba()` functional notation.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let err = || ParseColorError(input.to_string());
        if trimmed.is_empty() {
            return Err(err());
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args.strip_suffix(')').ok_or_else(err)?;
            return parse_functional(args).ok_or_else(err);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(err)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |index: usize| u8::from_str_radix(&hex[index..index + 1], 16).ok();
    let byte = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();

    match hex.len() {
        3 | 4 => {
            let r = nibble(0)? * 17;
            let g = nibble(1)? * 17;
            let b = nibble(2)? * 17;
            let a = if hex.len() == 4 { nibble(3)? * 17 } else { 255 };
            Some(Color::rgba(r, g, b, a))
        }
        6 | 8 => {
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
        }
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |value: &str| -> Option<u8> {
        let parsed: f32 = value.parse().ok()?;
        if !parsed.is_finite() {
            return None;
        }
        Some(parsed.round().clamp(0.0, 255.0) as u8)
    };

    let alpha = match parts.get(3) {
        Some(value) => {
            let parsed: f32 = value.parse().ok()?;
            if !parsed.is_finite() {
                return None;
            }
            (parsed.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some(Color::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}
