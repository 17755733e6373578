//! Parser State Machine
//!
//! A resumable byte-level state machine that turns an arbitrarily chunked
//! stream into `Action`s. Escape sequences and multi-byte characters may be
//! split across calls at any point; everything needed to pick up where the
//! previous call stopped lives in the `Parser`.
//!
//! States:
//! - ScanBytes: plain text, collecting a pending `Print` run
//! - EscapeStart: after ESC, waiting to see whether a CSI follows
//! - ControlSequence: after ESC [, collecting numeric parameters until a
//!   terminator byte, which is dispatched immediately
//!
//! Only a practical subset of CSI sequences is recognized. Anything else is
//! dropped without error and scanning resumes after the terminator.

use std::convert::Infallible;
use std::mem;

use tracing::trace;

use super::action::{Action, EraseMode, Position};
use super::{sgr, utf8};

const ESC: u8 = 0x1B;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ScanBytes,
    EscapeStart,
    ControlSequence,
}

/// Returned by [`Parser::parse_with`] when the action callback fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupted<E> {
    /// Bytes of the call's input the parser accepted before stopping
    pub consumed: usize,
    /// The callback's error
    pub error: E,
}

/// The escape sequence parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    /// Parameters of the current control sequence, `None` when left empty
    params: Vec<Option<u32>>,
    /// Parameter being accumulated
    current: Option<u32>,
    /// Incomplete trailing character from the previous call
    dangling: Vec<u8>,
    /// Reused for joining `dangling` with the next input
    scratch: Vec<u8>,
    /// Actions produced by one dispatch, drained right after
    dispatched: Vec<Action>,
    /// State on entry to the current call, restored when a failure lands
    /// on a sequence that began in an earlier call
    entry_state: State,
    entry_params: Vec<Option<u32>>,
    entry_current: Option<u32>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the ScanBytes state
    pub fn new() -> Self {
        Self {
            state: State::ScanBytes,
            params: Vec::with_capacity(16),
            current: None,
            dangling: Vec::with_capacity(utf8::MAX_CHAR_LEN),
            scratch: Vec::new(),
            dispatched: Vec::with_capacity(4),
            entry_state: State::ScanBytes,
            entry_params: Vec::with_capacity(16),
            entry_current: None,
        }
    }

    /// Reset the parser to its initial state, dropping any partial input
    pub fn reset(&mut self) {
        self.state = State::ScanBytes;
        self.clear_params();
        self.dangling.clear();
        self.dispatched.clear();
    }

    /// True if bytes from earlier calls are still waiting for more input
    pub fn has_pending(&self) -> bool {
        self.state != State::ScanBytes || !self.dangling.is_empty()
    }

    fn clear_params(&mut self) {
        self.params.clear();
        self.current = None;
    }

    /// Process a chunk of bytes, returning actions
    pub fn parse(&mut self, input: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        let result = self.parse_with(input, |action| -> Result<(), Infallible> {
            actions.push(action);
            Ok(())
        });
        if let Err(interrupted) = result {
            match interrupted.error {}
        }
        actions
    }

    /// Process a chunk of bytes, handing each action to `on_action` as soon
    /// as it is decoded.
    ///
    /// If the callback fails, parsing stops and the error is returned along
    /// with the number of input bytes accepted before the failing text run
    /// or escape sequence. Feeding `input[consumed..]` afterwards decodes
    /// that unit again, so the failed action is replayed together with any
    /// actions its sequence produced before it.
    pub fn parse_with<E, F>(&mut self, input: &[u8], mut on_action: F) -> Result<(), Interrupted<E>>
    where
        F: FnMut(Action) -> Result<(), E>,
    {
        self.entry_state = self.state;
        self.entry_params.clone_from(&self.params);
        self.entry_current = self.current;

        let mut joined = mem::take(&mut self.scratch);
        joined.clear();
        let carried = self.dangling.len();
        let data: &[u8] = if carried == 0 {
            input
        } else {
            joined.extend_from_slice(&self.dangling);
            joined.extend_from_slice(input);
            self.dangling.clear();
            &joined
        };

        let held = utf8::incomplete_tail(data);
        let body = &data[..data.len() - held];
        if held > 0 {
            trace!(held, "holding back incomplete UTF-8 tail");
            self.dangling.extend_from_slice(&data[body.len()..]);
        }

        let result = self.run(body, &mut on_action).map_err(|(start, error)| {
            // the caller feeds the unconsumed input again, held bytes included
            self.dangling.clear();
            let consumed = match start.and_then(|at| at.checked_sub(carried)) {
                Some(consumed) => {
                    self.state = State::ScanBytes;
                    self.clear_params();
                    consumed
                }
                None => {
                    // the failing unit began before this call
                    self.state = self.entry_state;
                    self.params.clone_from(&self.entry_params);
                    self.current = self.entry_current;
                    self.dangling.extend_from_slice(&data[..carried]);
                    0
                }
            };
            trace!(consumed, "action failed, parsing stopped");
            Interrupted { consumed, error }
        });

        self.scratch = joined;
        result
    }

    /// Drive the state machine over `body`. On failure, returns the offset
    /// into `body` where the failing unit starts, or `None` if it is a
    /// sequence carried over from an earlier call.
    fn run<E, F>(&mut self, body: &[u8], on_action: &mut F) -> Result<(), (Option<usize>, E)>
    where
        F: FnMut(Action) -> Result<(), E>,
    {
        let mut run_start = 0;
        let mut sequence_start = None;
        let mut i = 0;

        while i < body.len() {
            let byte = body[i];
            match self.state {
                State::ScanBytes => match byte {
                    ESC => {
                        flush(&body[run_start..i], on_action).map_err(|e| (Some(run_start), e))?;
                        sequence_start = Some(i);
                        i += 1;
                        self.clear_params();
                        self.state = State::EscapeStart;
                    }
                    b'\n' | b'\r' => {
                        flush(&body[run_start..i], on_action).map_err(|e| (Some(run_start), e))?;
                        let action = if byte == b'\n' {
                            Action::Linebreak
                        } else {
                            Action::CarriageReturn
                        };
                        on_action(action).map_err(|e| (Some(i), e))?;
                        i += 1;
                        run_start = i;
                    }
                    _ => i += 1,
                },
                State::EscapeStart => {
                    if byte == b'[' {
                        i += 1;
                        self.state = State::ControlSequence;
                    } else {
                        // lone ESC: drop it and rescan this byte as text
                        self.state = State::ScanBytes;
                        run_start = i;
                    }
                }
                State::ControlSequence => {
                    i += 1;
                    match byte {
                        b'0'..=b'9' => {
                            let digit = u32::from(byte - b'0');
                            let value = self.current.unwrap_or(0);
                            self.current = Some(value.saturating_mul(10).saturating_add(digit));
                        }
                        b';' => {
                            let param = self.current.take();
                            self.params.push(param);
                        }
                        _ => {
                            let param = self.current.take();
                            self.params.push(param);
                            self.state = State::ScanBytes;
                            run_start = i;
                            if self.dispatch(byte) {
                                for action in self.dispatched.drain(..) {
                                    on_action(action).map_err(|e| (sequence_start, e))?;
                                }
                            } else {
                                trace!(
                                    terminator = byte,
                                    params = ?self.params,
                                    "discarding unrecognized control sequence"
                                );
                            }
                            self.clear_params();
                        }
                    }
                }
            }
        }

        if self.state == State::ScanBytes {
            flush(&body[run_start..], on_action).map_err(|e| (Some(run_start), e))?;
        }
        Ok(())
    }

    /// Translate the collected parameters for `terminator` into actions.
    /// Returns false if the sequence is not recognized.
    fn dispatch(&mut self, terminator: u8) -> bool {
        let first = self.params.first().copied().flatten();
        let out = &mut self.dispatched;
        out.clear();

        match terminator {
            b'm' => {
                let count = self.params.len();
                for (i, param) in self.params.iter().enumerate() {
                    // "ESC[1;m" is bold only, but "ESC[m" is a reset
                    if i != 0 && i == count - 1 && param.is_none() {
                        break;
                    }
                    if let Some(action) = sgr::lookup(param.unwrap_or(0)) {
                        out.push(action);
                    }
                }
            }
            b'A' => out.push(Action::CursorUp(count_or(first, 1))),
            b'B' => out.push(Action::CursorDown(count_or(first, 1))),
            b'C' => out.push(Action::CursorForward(count_or(first, 1))),
            b'D' => out.push(Action::CursorBack(count_or(first, 1))),
            b'E' => {
                out.push(Action::CursorDown(count_or(first, 1)));
                out.push(Action::CursorColumn(0));
            }
            b'F' => {
                out.push(Action::CursorUp(count_or(first, 1)));
                out.push(Action::CursorColumn(0));
            }
            b'G' => out.push(Action::CursorColumn(count_or(first, 0))),
            b'H' | b'f' => {
                let second = self.params.get(1).copied().flatten();
                out.push(Action::CursorPosition(Position::new(
                    count_or(first, 1),
                    count_or(second, 1),
                )));
            }
            b's' => out.push(Action::SaveCursorPosition),
            b'u' => out.push(Action::RestoreCursorPosition),
            b'J' => {
                if let Some(mode) = EraseMode::from_param(first.unwrap_or(0)) {
                    out.push(Action::EraseDisplay(mode));
                }
            }
            b'K' => {
                if let Some(mode) = EraseMode::from_param(first.unwrap_or(0)) {
                    out.push(Action::EraseLine(mode));
                }
            }
            _ => {}
        }

        !out.is_empty()
    }
}

fn count_or(param: Option<u32>, default: u32) -> usize {
    param.unwrap_or(default) as usize
}

/// Emit the pending text run, copying it out of the input buffer
fn flush<E, F>(run: &[u8], on_action: &mut F) -> Result<(), E>
where
    F: FnMut(Action) -> Result<(), E>,
{
    if run.is_empty() {
        return Ok(());
    }
    on_action(Action::Print(run.to_vec()))
}
