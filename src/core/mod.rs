//! Terminal Core Module
//!
//! The rendering side of the crate. This module contains:
//! - Colors and styles
//! - Styled lines made of chunks
//! - The `Output` sink contract and its reference implementation, `Screen`
//! - The persisted snapshot form of a screen

mod line;
mod output;
mod screen;
mod snapshot;
mod style;

pub use line::{Chunk, Line};
pub(crate) use line::blank;
pub use output::Output;
pub use screen::Screen;
pub use snapshot::{ChunkSnapshot, Snapshot, StyleSnapshot};
pub use style::{Color, Style};
