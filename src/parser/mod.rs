//! Terminal escape sequence parser
//!
//! A stateful parser that converts an arbitrarily chunked byte stream into
//! terminal actions. Splitting the stream at different call boundaries never
//! changes what is decoded, only how text runs are divided between `Print`s.

mod action;
mod sgr;
mod state;
mod utf8;

pub use action::{Action, EraseMode, Modifier, Position};
pub use sgr::lookup as sgr_lookup;
pub use state::{Interrupted, Parser};
