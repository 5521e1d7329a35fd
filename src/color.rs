//! Color parsing and small color helpers shared by the brushes and the host UI.

use egui::{Color32, Rgba};

use crate::error::ConfigurationError;

const NAMED_COLORS: &[(&str, Color32)] = &[
    ("black", Color32::BLACK),
    ("white", Color32::WHITE),
    ("red", Color32::from_rgb(255, 0, 0)),
    ("green", Color32::from_rgb(0, 128, 0)),
    ("lime", Color32::from_rgb(0, 255, 0)),
    ("blue", Color32::from_rgb(0, 0, 255)),
    ("yellow", Color32::from_rgb(255, 255, 0)),
    ("orange", Color32::from_rgb(255, 165, 0)),
    ("purple", Color32::from_rgb(128, 0, 128)),
    ("gray", Color32::from_rgb(128, 128, 128)),
    ("grey", Color32::from_rgb(128, 128, 128)),
    ("transparent", Color32::TRANSPARENT),
];

/// Parse a CSS-style color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)`, `rgba(r, g, b, a)` or a basic color name.
pub fn parse_color(input: &str) -> Result<Color32, ConfigurationError> {
    let text = input.trim();
    let invalid = || ConfigurationError::InvalidColor(input.to_string());

    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    let lower = text.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(args).ok_or_else(invalid);
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
        .ok_or_else(invalid)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let [r, g, b, a] = match hex.len() {
        3 => [nibble(0)?, nibble(1)?, nibble(2)?, 255],
        4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
        6 => [byte(0)?, byte(2)?, byte(4)?, 255],
        8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
        _ => return None,
    };
    Some(Color32::from_rgba_unmultiplied(r, g, b, a))
}

fn parse_functional(args: &str) -> Option<Color32> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<f32>().ok().filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 255.0).round() as u8);

    match parts.as_slice() {
        [r, g, b] => Some(Color32::from_rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().ok().filter(|v| v.is_finite())?.clamp(0.0, 1.0);
            Some(Color32::from_rgba_unmultiplied(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

/// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Linear-space, non-premultiplied channels of a color plus its alpha
pub fn linear_channels(color: Color32) -> ([f32; 3], f32) {
    let rgba = Rgba::from(color);
    let a = rgba.a();
    if a <= 0.0 {
        return ([0.0; 3], 0.0);
    }
    ([rgba.r() / a, rgba.g() / a, rgba.b() / a], a)
}

/// Mix two colors in sRGB space; `t = 0` gives `a`, `t = 1` gives `b`
pub fn mix(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let [ar, ag, ab, aa] = a.to_srgba_unmultiplied();
    let [br, bg, bb, ba] = b.to_srgba_unmultiplied();
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(lerp(ar, br), lerp(ag, bg), lerp(ab, bb), lerp(aa, ba))
}

/// Move a color toward white (`amount > 0`) or black (`amount < 0`), keeping alpha
pub fn with_lightness(color: Color32, amount: f32) -> Color32 {
    let alpha = color.to_srgba_unmultiplied()[3];
    let target = if amount >= 0.0 {
        Color32::from_rgba_unmultiplied(255, 255, 255, alpha)
    } else {
        Color32::from_rgba_unmultiplied(0, 0, 0, alpha)
    };
    mix(color, target, amount.abs())
}

/// Serde adapter storing a `Color32` as a hex string
pub mod hex {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_color(&text).map_err(serde::de::Error::custom)
    }
}
