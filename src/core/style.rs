//! Colors and text style
//!
//! A `Style` is a small value type. Two chunks can only be merged when their
//! styles compare equal.

use serde::{Deserialize, Serialize};

use crate::parser::Modifier;

/// One of the 16 ANSI colors, or the terminal default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Standard colors in SGR order (30-37 / 40-47)
    pub const STANDARD: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// Bright colors in SGR order (90-97 / 100-107)
    pub const BRIGHT: [Color; 8] = [
        Color::BrightBlack,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
        Color::BrightMagenta,
        Color::BrightCyan,
        Color::BrightWhite,
    ];

    pub fn is_default(&self) -> bool {
        *self == Color::Default
    }

    /// Name used in the persisted form. Empty for the default color.
    pub fn name(&self) -> &'static str {
        match self {
            Color::Default => "",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::BrightBlack => "bright-black",
            Color::BrightRed => "bright-red",
            Color::BrightGreen => "bright-green",
            Color::BrightYellow => "bright-yellow",
            Color::BrightBlue => "bright-blue",
            Color::BrightMagenta => "bright-magenta",
            Color::BrightCyan => "bright-cyan",
            Color::BrightWhite => "bright-white",
        }
    }
}

/// Text style: colors plus a set of modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    modifiers: u8,
}

impl Style {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg, modifiers: 0 }
    }

    /// Builder-style helper, mostly for tests
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.set(modifier, true);
        self
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers & modifier.bit() != 0
    }

    pub fn set(&mut self, modifier: Modifier, on: bool) {
        if on {
            self.modifiers |= modifier.bit();
        } else {
            self.modifiers &= !modifier.bit();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert!(style.is_default());
        assert_eq!(style.fg, Color::Default);
        assert!(Modifier::ALL.iter().all(|m| !style.has(*m)));
    }

    #[test]
    fn test_style_set_and_clear() {
        let mut style = Style::default();
        style.set(Modifier::Bold, true);
        style.set(Modifier::Framed, true);
        assert!(style.has(Modifier::Bold));
        assert!(style.has(Modifier::Framed));
        assert!(!style.has(Modifier::Italic));

        style.set(Modifier::Bold, false);
        assert!(!style.has(Modifier::Bold));
        assert!(style.has(Modifier::Framed));
    }

    #[test]
    fn test_style_equality_is_by_content() {
        let a = Style::new(Color::Red, Color::Default).with(Modifier::Italic);
        let mut b = Style::default();
        b.fg = Color::Red;
        b.set(Modifier::Italic, true);
        assert_eq!(a, b);
        b.reset();
        assert_ne!(a, b);
    }

    #[test]
    fn test_color_names() {
        assert_eq!(Color::Default.name(), "");
        assert_eq!(Color::BrightMagenta.name(), "bright-magenta");
        let json = serde_json::to_string(&Color::BrightCyan).unwrap();
        assert_eq!(json, "\"bright-cyan\"");
    }
}
