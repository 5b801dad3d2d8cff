//! # Colors Module
//!
//! Turns the color strings users put in their config (and pass to the
//! template's `fg_color`/`bg_color`) into SGR escape sequences, and decodes
//! Nerd Font icon escapes into characters.

/// SGR reset
pub const RESET: &str = "\x1b[0m";

/// The eight base colors plus `default`, as foreground SGR codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Default,
}

impl NamedColor {
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => NamedColor::Black,
            "red" => NamedColor::Red,
            "green" => NamedColor::Green,
            "yellow" => NamedColor::Yellow,
            "blue" => NamedColor::Blue,
            "magenta" => NamedColor::Magenta,
            "cyan" => NamedColor::Cyan,
            "white" => NamedColor::White,
            "default" => NamedColor::Default,
            _ => return None,
        };
        Some(color)
    }

    /// Base (foreground) code
    pub fn code(self) -> u8 {
        match self {
            NamedColor::Black => 30,
            NamedColor::Red => 31,
            NamedColor::Green => 32,
            NamedColor::Yellow => 33,
            NamedColor::Blue => 34,
            NamedColor::Magenta => 35,
            NamedColor::Cyan => 36,
            NamedColor::White => 37,
            NamedColor::Default => 0,
        }
    }

    fn background_code(self) -> u8 {
        match self {
            NamedColor::Default => 49,
            other => other.code() + 10,
        }
    }
}

/// A parsed color specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Color {
    /// `#rrggbb`, reduced to the xterm 256-color palette
    Palette(u8),
    Named(NamedColor),
    /// Anything else is handed to the terminal untouched
    Raw(String),
}

impl Color {
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with('#') {
            return Color::Palette(hex_to_ansi256(spec));
        }
        match NamedColor::from_name(spec) {
            Some(named) => Color::Named(named),
            None => Color::Raw(spec.to_string()),
        }
    }

    pub fn foreground(&self) -> String {
        match self {
            Color::Palette(n) => format!("\x1b[38;5;{n}m"),
            Color::Named(c) => format!("\x1b[{}m", c.code()),
            Color::Raw(raw) => format!("\x1b[{raw}m"),
        }
    }

    pub fn background(&self) -> String {
        match self {
            Color::Palette(n) => format!("\x1b[48;5;{n}m"),
            Color::Named(c) => format!("\x1b[{}m", c.background_code()),
            Color::Raw(raw) => format!("\x1b[{raw}m"),
        }
    }
}

pub fn fg_color(spec: &str) -> String {
    Color::parse(spec).foreground()
}

pub fn bg_color(spec: &str) -> String {
    Color::parse(spec).background()
}

fn hex_channel(hex: &str, idx: usize) -> u32 {
    hex.get(idx * 2..idx * 2 + 2)
        .and_then(|s| u32::from_str_radix(s, 16).ok())
        .unwrap_or(0)
}

/// Nearest xterm-256 index for a `#rrggbb` value (the `#` is optional).
///
/// Equal channels go to the grayscale ramp (232..=255, with 16 and 231 for
/// the extremes); everything else to the 6x6x6 cube.
pub fn hex_to_ansi256(hex: &str) -> u8 {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let (r, g, b) = (hex_channel(hex, 0), hex_channel(hex, 1), hex_channel(hex, 2));

    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        // 248 would step past the end of the ramp
        return ((r - 8) / 10 + 232).min(255) as u8;
    }

    let scale = |c: u32| c * 5 / 255;
    (16 + 36 * scale(r) + 6 * scale(g) + scale(b)) as u8
}

/// Decode `\ue718` (or bare `e718`, `f0b02`) into the character it names.
/// Malformed hex decodes to an empty string; well-formed hex that is not a
/// scalar value (a surrogate, or past U+10FFFF) decodes to U+FFFD.
pub fn decode_unicode_hex(escape: &str) -> String {
    let hex = escape.strip_prefix("\\u").unwrap_or(escape);
    match u32::from_str_radix(hex, 16) {
        Ok(code) => char::from_u32(code)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string(),
        Err(_) => String::new(),
    }
}
