//! The sink that decoded prints and erasures are rendered into

use super::Style;
use crate::error::OutputError;
use crate::parser::Position;

/// Destination for the visible effects of terminal actions.
///
/// `Screen` is the reference implementation. Other sinks (direct renderers,
/// paginated stores) can be plugged into a `Terminal` instead.
pub trait Output {
    /// Write `data` at `pos` using `style`.
    ///
    /// `data` is only borrowed for the duration of the call.
    fn print(&mut self, data: &[u8], style: Style, pos: Position) -> Result<(), OutputError>;

    /// Truncate the addressed line, discarding everything at or after `pos.col`.
    fn clear_right(&mut self, pos: Position) -> Result<(), OutputError>;
}

impl<O: Output + ?Sized> Output for &mut O {
    fn print(&mut self, data: &[u8], style: Style, pos: Position) -> Result<(), OutputError> {
        (**self).print(data, style, pos)
    }

    fn clear_right(&mut self, pos: Position) -> Result<(), OutputError> {
        (**self).clear_right(pos)
    }
}
