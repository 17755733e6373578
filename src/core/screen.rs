//! Line buffer
//!
//! The default `Output` sink: an ordered list of styled lines that grows as
//! content is written. Prints may land anywhere, including inside existing
//! content or far past the end of the buffer.

use tracing::trace;

use super::line::Line;
use super::output::Output;
use super::snapshot::Snapshot;
use super::Style;
use crate::error::OutputError;
use crate::parser::Position;

/// Rendered terminal output, one `Line` per row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    lines: Vec<Line>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Length of one row in bytes, 0 for rows that don't exist
    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, Line::len)
    }

    /// Unstyled content of one row
    pub fn text(&self, index: usize) -> Option<String> {
        self.lines.get(index).map(Line::text)
    }

    /// Unstyled content of the whole buffer, rows joined by newlines
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Persisted form of the buffer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(snapshot.into())
    }

    /// Write into the buffer, growing it as needed
    pub fn write_at(&mut self, data: &[u8], style: Style, pos: Position) {
        if data.is_empty() {
            return;
        }
        if pos.line >= self.lines.len() {
            trace!(from = self.lines.len(), to = pos.line + 1, "growing screen");
            self.lines.resize_with(pos.line + 1, Line::new);
        }
        self.lines[pos.line].print(pos.col, data, style);
    }

    /// Truncate one row at `pos.col`. Rows that don't exist are left alone.
    pub fn truncate_at(&mut self, pos: Position) {
        if let Some(line) = self.lines.get_mut(pos.line) {
            line.clear_right(pos.col);
        }
    }
}

impl From<Vec<Line>> for Screen {
    fn from(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

impl Output for Screen {
    fn print(&mut self, data: &[u8], style: Style, pos: Position) -> Result<(), OutputError> {
        self.write_at(data, style, pos);
        Ok(())
    }

    fn clear_right(&mut self, pos: Position) -> Result<(), OutputError> {
        self.truncate_at(pos);
        Ok(())
    }
}
