//! SGR (Select Graphic Rendition) lookup
//!
//! Maps a single numeric SGR parameter to the action it produces.
//! See <https://en.wikipedia.org/wiki/ANSI_escape_code#SGR>

use super::action::{Action, Modifier};
use crate::core::Color;

/// Codes at or above this are never mapped
pub const MAX_CODE: u32 = 128;

/// Look up the action for an SGR code, or `None` if the code is unsupported
pub fn lookup(code: u32) -> Option<Action> {
    if code >= MAX_CODE {
        return None;
    }
    let action = match code {
        0 => Action::Reset,
        1 => Action::SetModifier(Modifier::Bold, true),
        2 => Action::SetModifier(Modifier::Faint, true),
        3 => Action::SetModifier(Modifier::Italic, true),
        4 => Action::SetModifier(Modifier::Underline, true),
        5 => Action::SetModifier(Modifier::Blink, true),
        7 => Action::SetModifier(Modifier::Inverted, true),
        20 => Action::SetModifier(Modifier::Fraktur, true),
        30..=37 => Action::SetForeground(Color::STANDARD[(code - 30) as usize]),
        39 => Action::SetForeground(Color::Default),
        40..=47 => Action::SetBackground(Color::STANDARD[(code - 40) as usize]),
        49 => Action::SetBackground(Color::Default),
        90..=97 => Action::SetForeground(Color::BRIGHT[(code - 90) as usize]),
        100..=107 => Action::SetBackground(Color::BRIGHT[(code - 100) as usize]),
        _ => return None,
    };
    Some(action)
}
