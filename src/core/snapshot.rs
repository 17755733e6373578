//! Persisted form of the line buffer
//!
//! A snapshot is a list of rows, each a list of `{data, style}` objects.
//! Default colors and unset modifiers are omitted from the output, so an
//! unstyled chunk serializes as `{"data":"...","style":{}}`.
//!
//! Chunk data is stored as bytes in memory. Valid UTF-8 round-trips exactly;
//! invalid sequences are replaced with U+FFFD when converting to a snapshot.

use serde::{Deserialize, Serialize};

use super::line::{Chunk, Line};
use super::screen::Screen;
use super::{Color, Style};
use crate::parser::Modifier;

/// Serializable copy of a `Screen`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub lines: Vec<Vec<ChunkSnapshot>>,
}

/// Snapshot of a single chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSnapshot {
    pub data: String,
    #[serde(default)]
    pub style: StyleSnapshot,
}

/// Snapshot of a style, omitting defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    #[serde(default, skip_serializing_if = "Color::is_default")]
    pub fg: Color,
    #[serde(default, skip_serializing_if = "Color::is_default")]
    pub bg: Color,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub faint: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverted: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fraktur: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub framed: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<&Style> for StyleSnapshot {
    fn from(style: &Style) -> Self {
        Self {
            fg: style.fg,
            bg: style.bg,
            bold: style.has(Modifier::Bold),
            faint: style.has(Modifier::Faint),
            italic: style.has(Modifier::Italic),
            underline: style.has(Modifier::Underline),
            blink: style.has(Modifier::Blink),
            inverted: style.has(Modifier::Inverted),
            fraktur: style.has(Modifier::Fraktur),
            framed: style.has(Modifier::Framed),
        }
    }
}

impl From<StyleSnapshot> for Style {
    fn from(snapshot: StyleSnapshot) -> Self {
        let mut style = Style::new(snapshot.fg, snapshot.bg);
        style.set(Modifier::Bold, snapshot.bold);
        style.set(Modifier::Faint, snapshot.faint);
        style.set(Modifier::Italic, snapshot.italic);
        style.set(Modifier::Underline, snapshot.underline);
        style.set(Modifier::Blink, snapshot.blink);
        style.set(Modifier::Inverted, snapshot.inverted);
        style.set(Modifier::Fraktur, snapshot.fraktur);
        style.set(Modifier::Framed, snapshot.framed);
        style
    }
}

impl From<&Chunk> for ChunkSnapshot {
    fn from(chunk: &Chunk) -> Self {
        Self {
            data: chunk.text().into_owned(),
            style: StyleSnapshot::from(&chunk.style),
        }
    }
}

impl Snapshot {
    pub fn from_screen(screen: &Screen) -> Self {
        let lines = screen
            .lines()
            .iter()
            .map(|line| line.chunks().iter().map(ChunkSnapshot::from).collect())
            .collect();
        Self { lines }
    }
}

impl From<Snapshot> for Screen {
    fn from(snapshot: Snapshot) -> Self {
        let lines: Vec<Line> = snapshot
            .lines
            .into_iter()
            .map(|chunks| {
                Line::from_chunks(
                    chunks
                        .into_iter()
                        .map(|c| Chunk::new(c.data, c.style.into()))
                        .collect(),
                )
            })
            .collect();
        Screen::from(lines)
    }
}
