//! ANSI Lines
//!
//! Decodes a stream of bytes containing ANSI/VT100 escape sequences and
//! renders it into a buffer of styled lines.
//!
//! - `parser`: resumable escape sequence parser producing `Action`s
//! - `terminal`: cursor and style state, and the `Terminal` writer tying
//!   parser, state and output together
//! - `core`: styles, chunked lines, the `Screen` buffer and its snapshot form
//! - `config`: session options
//!
//! ```
//! use ansi_lines::Terminal;
//!
//! let mut terminal = Terminal::default();
//! terminal.feed(b"\x1b[1mbold\x1b[m text\nline 2").unwrap();
//! assert_eq!(terminal.output().to_text(), "bold text\nline 2");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod parser;
pub mod terminal;

pub use config::{Config, LineDiscipline};
pub use crate::core::{Chunk, Color, Line, Output, Screen, Snapshot, Style};
pub use error::{ConfigError, OutputError, WriteError};
pub use parser::{Action, EraseMode, Modifier, Parser, Position};
pub use terminal::{State, Terminal};
