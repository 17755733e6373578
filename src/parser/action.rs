//! Terminal Actions
//!
//! Semantic operations produced by the parser that should be applied to the
//! terminal state. Every action renders to a stable, human-readable form via
//! `Display`, which is what diagnostics and test failures print.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// A zero-based cursor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}C{}", self.line, self.col)
    }
}

/// Style modifier toggled by SGR sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Bold,
    Faint,
    Italic,
    Underline,
    Blink,
    Inverted,
    Fraktur,
    Framed,
}

impl Modifier {
    pub const ALL: [Modifier; 8] = [
        Modifier::Bold,
        Modifier::Faint,
        Modifier::Italic,
        Modifier::Underline,
        Modifier::Blink,
        Modifier::Inverted,
        Modifier::Fraktur,
        Modifier::Framed,
    ];

    /// Bit used for this modifier inside a `Style`
    pub(crate) const fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Modifier::Bold => "Bold",
            Modifier::Faint => "Faint",
            Modifier::Italic => "Italic",
            Modifier::Underline => "Underline",
            Modifier::Blink => "Blink",
            Modifier::Inverted => "Inverted",
            Modifier::Fraktur => "Fraktur",
            Modifier::Framed => "Framed",
        }
    }
}

/// Which part of the line (or display) an erase applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EraseMode {
    /// From the cursor to the end (CSI 0 K)
    ToEnd,
    /// From the start to the cursor (CSI 1 K)
    ToBeginning,
    /// Everything (CSI 2 K)
    All,
}

impl EraseMode {
    /// Map a CSI parameter to an erase mode
    pub fn from_param(param: u32) -> Option<Self> {
        match param {
            0 => Some(EraseMode::ToEnd),
            1 => Some(EraseMode::ToBeginning),
            2 => Some(EraseMode::All),
            _ => None,
        }
    }
}

impl fmt::Display for EraseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EraseMode::ToEnd => "EraseToEnd",
            EraseMode::ToBeginning => "EraseToBeginning",
            EraseMode::All => "EraseAll",
        };
        f.write_str(name)
    }
}

/// A terminal action produced by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Print a run of bytes at the cursor. The bytes are owned by the action.
    Print(Vec<u8>),

    /// SGR 0 - reset the style to its zero value
    Reset,
    SetForeground(Color),
    SetBackground(Color),
    SetModifier(Modifier, bool),

    /// LF
    Linebreak,
    /// CR
    CarriageReturn,

    /// CUU
    CursorUp(usize),
    /// CUD
    CursorDown(usize),
    /// CUF
    CursorForward(usize),
    /// CUB
    CursorBack(usize),
    /// CUP / HVP, carrying the parameters as given
    CursorPosition(Position),
    /// CHA
    CursorColumn(usize),

    /// EL
    EraseLine(EraseMode),
    /// ED - decoded but never applied
    EraseDisplay(EraseMode),

    /// CSI s
    SaveCursorPosition,
    /// CSI u
    RestoreCursorPosition,
}

impl Action {
    /// Build a print action from anything byte-like
    pub fn print(data: impl AsRef<[u8]>) -> Self {
        Action::Print(data.as_ref().to_vec())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Print(data) => write!(f, "Print({})", String::from_utf8_lossy(data)),
            Action::Reset => f.write_str("Reset"),
            Action::SetForeground(color) => write!(f, "SetForeground({})", color.name()),
            Action::SetBackground(color) => write!(f, "SetBackground({})", color.name()),
            Action::SetModifier(modifier, on) => write!(f, "Set{}({})", modifier.name(), on),
            Action::Linebreak => f.write_str("Linebreak"),
            Action::CarriageReturn => f.write_str("CarriageReturn"),
            Action::CursorUp(n) => write!(f, "CursorUp({})", n),
            Action::CursorDown(n) => write!(f, "CursorDown({})", n),
            Action::CursorForward(n) => write!(f, "CursorForward({})", n),
            Action::CursorBack(n) => write!(f, "CursorBack({})", n),
            Action::CursorPosition(pos) => write!(f, "CursorPosition({})", pos),
            Action::CursorColumn(col) => write!(f, "CursorColumn({})", col),
            Action::EraseLine(mode) => write!(f, "EraseLine({})", mode),
            Action::EraseDisplay(mode) => write!(f, "EraseDisplay({})", mode),
            Action::SaveCursorPosition => f.write_str("SaveCursorPosition"),
            Action::RestoreCursorPosition => f.write_str("RestoreCursorPosition"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::print("hello").to_string(), "Print(hello)");
        assert_eq!(Action::SetForeground(Color::Red).to_string(), "SetForeground(red)");
        assert_eq!(
            Action::SetModifier(Modifier::Bold, true).to_string(),
            "SetBold(true)"
        );
        assert_eq!(
            Action::CursorPosition(Position::new(1, 2)).to_string(),
            "CursorPosition(L1C2)"
        );
        assert_eq!(
            Action::EraseLine(EraseMode::All).to_string(),
            "EraseLine(EraseAll)"
        );
        assert_eq!(Action::RestoreCursorPosition.to_string(), "RestoreCursorPosition");
    }

    #[test]
    fn test_erase_mode_from_param() {
        assert_eq!(EraseMode::from_param(0), Some(EraseMode::ToEnd));
        assert_eq!(EraseMode::from_param(1), Some(EraseMode::ToBeginning));
        assert_eq!(EraseMode::from_param(2), Some(EraseMode::All));
        assert_eq!(EraseMode::from_param(3), None);
    }

    #[test]
    fn test_modifier_bits_are_distinct() {
        let mut seen = 0u8;
        for modifier in Modifier::ALL {
            assert_eq!(seen & modifier.bit(), 0);
            seen |= modifier.bit();
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::CursorPosition(Position::new(3, 4));
        let json = serde_json::to_string(&action).unwrap();
        let restored: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, restored);
    }
}
