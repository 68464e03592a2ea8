//! CSS color strings as stored on slides and layers.
//!
//! Colors stay strings in the data model so projects round-trip byte-for-byte through
//! durable storage; rendering resolves them through [`parse_css_color`].

use peniko::Color;

/// Sentinel for "no background".
pub const TRANSPARENT: &str = "transparent";

/// Whether a stored color string means "no fill".
pub fn is_transparent(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(TRANSPARENT)
}

/// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` or `transparent`.
///
/// Returns `None` for anything else; callers decide the fallback.
pub fn parse_css_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if is_transparent(value) {
        return Some(Color::from_rgba8(0, 0, 0, 0));
    }
    let hex = value.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}

/// Format a color as `#rrggbb` (alpha dropped), the form color pickers emit.
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b)
}
