//! Terminal Executor
//!
//! Ties together the parser, the cursor/style state, and an output sink.
//! `State` interprets one action at a time; `Terminal` feeds it decoded
//! bytes and forwards visible effects to its `Output`.

use std::io;

use tracing::{debug, trace};

use crate::config::{Config, LineDiscipline};
use crate::core::{blank, Output, Screen, Style};
use crate::error::{OutputError, WriteError};
use crate::parser::{Action, EraseMode, Parser, Position};

/// Cursor, style and bounds of a terminal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub style: Style,
    pub line_discipline: LineDiscipline,
    pub position: Position,
    pub saved_position: Option<Position>,
    /// Largest row reached by a line break (or the initial bound)
    pub max_line: usize,
    /// Largest column reached by printing (or the initial bound)
    pub max_col: usize,
}

impl Default for State {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl State {
    pub fn new(config: &Config) -> Self {
        Self {
            style: Style::default(),
            line_discipline: config.line_discipline,
            position: Position::default(),
            saved_position: None,
            max_line: config.lines,
            max_col: config.cols,
        }
    }

    /// Apply a single action, sending any visible effect to `output`
    pub fn apply<O: Output + ?Sized>(&mut self, action: Action, output: &mut O) -> Result<(), OutputError> {
        match action {
            Action::Print(data) => {
                output.print(&data, self.style, self.position)?;
                // columns are byte offsets, not glyph counts
                let end = self.position.col + data.len();
                self.max_col = self.max_col.max(end);
                self.position.col = end;
            }
            Action::Reset => self.style.reset(),
            Action::SetForeground(color) => self.style.fg = color,
            Action::SetBackground(color) => self.style.bg = color,
            Action::SetModifier(modifier, on) => self.style.set(modifier, on),
            Action::CursorUp(n) => {
                self.move_to(self.position.line.saturating_sub(n), self.position.col);
            }
            Action::CursorDown(n) => {
                self.move_to(self.position.line.saturating_add(n), self.position.col);
            }
            Action::CursorForward(n) => {
                self.move_to(self.position.line, self.position.col.saturating_add(n));
            }
            Action::CursorBack(n) => {
                self.move_to(self.position.line, self.position.col.saturating_sub(n));
            }
            Action::CursorPosition(pos) => self.move_to(pos.line, pos.col),
            Action::CursorColumn(col) => self.move_to(self.position.line, col),
            Action::Linebreak => {
                self.position.line += 1;
                if self.line_discipline == LineDiscipline::Cooked {
                    self.position.col = 0;
                }
                self.max_line = self.max_line.max(self.position.line);
            }
            Action::CarriageReturn => self.position.col = 0,
            Action::SaveCursorPosition => self.saved_position = Some(self.position),
            Action::RestoreCursorPosition => match self.saved_position {
                Some(pos) => self.position = pos,
                None => debug!("restore without a saved cursor position"),
            },
            Action::EraseLine(mode) => self.erase_line(mode, output)?,
            Action::EraseDisplay(mode) => {
                trace!(%mode, "display erase is not applied");
            }
        }
        Ok(())
    }

    fn erase_line<O: Output + ?Sized>(&mut self, mode: EraseMode, output: &mut O) -> Result<(), OutputError> {
        let line = self.position.line;
        match mode {
            EraseMode::ToBeginning => {
                let col = self.position.col;
                if col == 0 {
                    return Ok(());
                }
                output.print(&blank(col), Style::default(), Position::new(line, 0))
            }
            EraseMode::ToEnd => output.clear_right(Position::new(line, self.position.col + 1)),
            EraseMode::All => output.clear_right(Position::new(line, 0)),
        }
    }

    /// Absolute move, clamped to the current bounds
    fn move_to(&mut self, line: usize, col: usize) {
        self.position.line = line.min(self.max_line);
        self.position.col = col.min(self.max_col);
    }
}

/// A terminal session: parser, state and output sink
#[derive(Debug)]
pub struct Terminal<O: Output = Screen> {
    parser: Parser,
    state: State,
    output: O,
}

impl Default for Terminal<Screen> {
    fn default() -> Self {
        Self::new(Screen::new())
    }
}

impl<O: Output> Terminal<O> {
    /// Create a session with the default configuration
    pub fn new(output: O) -> Self {
        Self::with_config(output, Config::default())
    }

    pub fn with_config(output: O, config: Config) -> Self {
        Self {
            parser: Parser::new(),
            state: State::new(&config),
            output,
        }
    }

    /// Decode `input` and apply every complete action.
    ///
    /// Incomplete trailing escape sequences and characters are kept for the
    /// next call. The caller may reuse `input` as soon as this returns.
    ///
    /// If the output fails, `WriteError::consumed` is the offset of the text
    /// run or escape sequence that failed. Feeding `input[consumed..]` once
    /// the output recovers continues as if nothing had failed.
    pub fn feed(&mut self, input: &[u8]) -> Result<usize, WriteError> {
        let state = &mut self.state;
        let output = &mut self.output;
        self.parser
            .parse_with(input, |action| state.apply(action, output))
            .map_err(|interrupted| WriteError {
                consumed: interrupted.consumed,
                source: interrupted.error,
            })?;
        Ok(input.len())
    }

    /// Apply an already decoded action
    pub fn apply(&mut self, action: Action) -> Result<(), OutputError> {
        self.state.apply(action, &mut self.output)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

impl<O: Output> io::Write for Terminal<O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.feed(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::parser::Modifier;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Print(Vec<u8>, Style, Position),
        ClearRight(Position),
    }

    #[derive(Default)]
    struct SpyOutput {
        calls: Vec<Call>,
    }

    impl Output for SpyOutput {
        fn print(&mut self, data: &[u8], style: Style, pos: Position) -> Result<(), OutputError> {
            self.calls.push(Call::Print(data.to_vec(), style, pos));
            Ok(())
        }

        fn clear_right(&mut self, pos: Position) -> Result<(), OutputError> {
            self.calls.push(Call::ClearRight(pos));
            Ok(())
        }
    }

    fn run(state: &mut State, actions: Vec<Action>) -> Vec<Call> {
        let mut spy = SpyOutput::default();
        for action in actions {
            state.apply(action, &mut spy).unwrap();
        }
        spy.calls
    }

    #[test]
    fn test_print_advances_cursor() {
        let mut state = State::default();
        let calls = run(
            &mut state,
            vec![Action::print("some bytes"), Action::print("more")],
        );
        assert_eq!(
            calls,
            vec![
                Call::Print(b"some bytes".to_vec(), Style::default(), Position::new(0, 0)),
                Call::Print(b"more".to_vec(), Style::default(), Position::new(0, 10)),
            ]
        );
        assert_eq!(state.position, Position::new(0, 14));
    }

    #[test]
    fn test_print_uses_current_style() {
        let mut state = State::default();
        let calls = run(
            &mut state,
            vec![
                Action::SetForeground(Color::Red),
                Action::SetBackground(Color::BrightBlack),
                Action::SetModifier(Modifier::Italic, true),
                Action::print("x"),
                Action::SetModifier(Modifier::Italic, false),
                Action::Reset,
                Action::print("y"),
            ],
        );
        let styled = Style::new(Color::Red, Color::BrightBlack).with(Modifier::Italic);
        assert_eq!(
            calls,
            vec![
                Call::Print(b"x".to_vec(), styled, Position::new(0, 0)),
                Call::Print(b"y".to_vec(), Style::default(), Position::new(0, 1)),
            ]
        );
    }

    #[test]
    fn test_multibyte_print_advances_by_bytes() {
        let mut state = State::default();
        run(&mut state, vec![Action::print("こ")]);
        assert_eq!(state.position.col, 3);
    }

    #[test]
    fn test_linebreak_cooked_and_raw() {
        let mut cooked = State::default();
        run(&mut cooked, vec![Action::print("abc"), Action::Linebreak]);
        assert_eq!(cooked.position, Position::new(1, 0));

        let mut raw = State::new(&Config::default().with_line_discipline(LineDiscipline::Raw));
        run(&mut raw, vec![Action::print("abc"), Action::Linebreak]);
        assert_eq!(raw.position, Position::new(1, 3));
    }

    #[test]
    fn test_carriage_return() {
        let mut state = State::default();
        run(&mut state, vec![Action::print("abc"), Action::CarriageReturn]);
        assert_eq!(state.position, Position::new(0, 0));
    }

    #[test]
    fn test_cursor_moves_clamp_to_bounds() {
        let mut state = State::default();
        run(
            &mut state,
            vec![Action::CursorDown(100), Action::CursorForward(500)],
        );
        assert_eq!(state.position, Position::new(48, 80));

        run(&mut state, vec![Action::CursorUp(1000), Action::CursorBack(1000)]);
        assert_eq!(state.position, Position::new(0, 0));

        run(&mut state, vec![Action::CursorPosition(Position::new(60, 90))]);
        assert_eq!(state.position, Position::new(48, 80));
        assert_eq!((state.max_line, state.max_col), (48, 80));
    }

    #[test]
    fn test_bounds_grow_only_by_content() {
        let mut state = State::default();
        run(&mut state, vec![Action::CursorColumn(75), Action::print("0123456789")]);
        assert_eq!(state.max_col, 85);
        run(&mut state, vec![Action::CursorColumn(200)]);
        assert_eq!(state.position.col, 85);

        for _ in 0..50 {
            run(&mut state, vec![Action::Linebreak]);
        }
        assert_eq!(state.max_line, 50);
        run(&mut state, vec![Action::CursorUp(5), Action::CursorDown(100)]);
        assert_eq!(state.position.line, 50);
    }

    #[test]
    fn test_save_and_restore() {
        let mut state = State::default();
        run(
            &mut state,
            vec![
                Action::CursorPosition(Position::new(2, 3)),
                Action::SaveCursorPosition,
                Action::CursorPosition(Position::new(5, 6)),
                Action::RestoreCursorPosition,
            ],
        );
        assert_eq!(state.position, Position::new(2, 3));
    }

    #[test]
    fn test_restore_without_save_is_noop() {
        let mut state = State::default();
        run(
            &mut state,
            vec![Action::CursorColumn(4), Action::RestoreCursorPosition],
        );
        assert_eq!(state.position, Position::new(0, 4));
    }

    #[test]
    fn test_erase_line_calls() {
        let mut state = State::default();
        let calls = run(
            &mut state,
            vec![
                Action::print("some bytes"),
                Action::EraseLine(EraseMode::ToBeginning),
                Action::EraseLine(EraseMode::ToEnd),
                Action::EraseLine(EraseMode::All),
                Action::print("some more bytes"),
            ],
        );
        assert_eq!(
            calls,
            vec![
                Call::Print(b"some bytes".to_vec(), Style::default(), Position::new(0, 0)),
                Call::Print(b"          ".to_vec(), Style::default(), Position::new(0, 0)),
                Call::ClearRight(Position::new(0, 11)),
                Call::ClearRight(Position::new(0, 0)),
                Call::Print(b"some more bytes".to_vec(), Style::default(), Position::new(0, 10)),
            ]
        );
    }

    #[test]
    fn test_erase_to_beginning_at_column_zero() {
        let mut state = State::default();
        let calls = run(&mut state, vec![Action::EraseLine(EraseMode::ToBeginning)]);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_erase_to_beginning_uses_default_style() {
        let mut state = State::default();
        let calls = run(
            &mut state,
            vec![
                Action::SetModifier(Modifier::Bold, true),
                Action::CursorColumn(2),
                Action::EraseLine(EraseMode::ToBeginning),
            ],
        );
        assert_eq!(
            calls,
            vec![Call::Print(b"  ".to_vec(), Style::default(), Position::new(0, 0))]
        );
        assert!(state.style.has(Modifier::Bold));
    }

    #[test]
    fn test_erase_display_is_inert() {
        let mut state = State::default();
        let before = state.clone();
        let calls = run(&mut state, vec![Action::EraseDisplay(EraseMode::All)]);
        assert!(calls.is_empty());
        assert_eq!(state, before);
    }

    /// A screen that refuses the next `failures` writes
    #[derive(Default)]
    struct FlakyOutput {
        screen: Screen,
        failures: usize,
    }

    impl FlakyOutput {
        fn check(&mut self) -> Result<(), OutputError> {
            if self.failures == 0 {
                return Ok(());
            }
            self.failures -= 1;
            Err(OutputError::Storage("disk full".to_string()))
        }
    }

    impl Output for FlakyOutput {
        fn print(&mut self, data: &[u8], style: Style, pos: Position) -> Result<(), OutputError> {
            self.check()?;
            self.screen.print(data, style, pos)
        }

        fn clear_right(&mut self, pos: Position) -> Result<(), OutputError> {
            self.check()?;
            self.screen.clear_right(pos)
        }
    }

    #[test]
    fn test_feed_resumes_after_failed_print() {
        let mut terminal = Terminal::new(FlakyOutput::default());
        let input = b"\x1b[1m\nabc\x1b[0mdef";
        terminal.output_mut().failures = 1;

        let err = terminal.feed(input).unwrap_err();
        assert_eq!(err.consumed, 5);
        assert!(matches!(err.source, OutputError::Storage(_)));
        // the cursor did not move for the failed print
        assert_eq!(terminal.state().position, Position::new(1, 0));

        terminal.feed(&input[err.consumed..]).unwrap();
        let screen = &terminal.output().screen;
        assert_eq!(screen.to_text(), "\nabcdef");
        let chunks = screen.line(1).unwrap().chunks();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].style.has(Modifier::Bold));
        assert_eq!(chunks[1].style, Style::default());
    }

    #[test]
    fn test_feed_resumes_from_start_of_run() {
        let mut terminal = Terminal::new(FlakyOutput::default());
        let input = b"abc\x1b[1mdef";
        terminal.output_mut().failures = 1;

        let err = terminal.feed(input).unwrap_err();
        assert_eq!(err.consumed, 0);
        terminal.feed(&input[err.consumed..]).unwrap();
        assert_eq!(terminal.output().screen.to_text(), "abcdef");
    }

    #[test]
    fn test_feed_resumes_with_carried_character() {
        let mut terminal = Terminal::new(FlakyOutput::default());
        terminal.feed(b"x\xe3").unwrap();

        let input = b"\x81\x93yz";
        terminal.output_mut().failures = 1;
        let err = terminal.feed(input).unwrap_err();
        assert_eq!(err.consumed, 0);

        terminal.feed(&input[err.consumed..]).unwrap();
        assert_eq!(terminal.output().screen.to_text(), "xこyz");
    }

    #[test]
    fn test_feed_resumes_after_failed_erase() {
        let mut terminal = Terminal::new(FlakyOutput::default());
        terminal.feed(b"keep this").unwrap();

        let input = b"\r\x1b[2Kdone";
        terminal.output_mut().failures = 1;
        let err = terminal.feed(input).unwrap_err();
        assert_eq!(err.consumed, 1);
        assert_eq!(terminal.output().screen.to_text(), "keep this");

        terminal.feed(&input[err.consumed..]).unwrap();
        assert_eq!(terminal.output().screen.to_text(), "done");
    }

    #[test]
    fn test_io_write() {
        use std::io::Write;

        let mut terminal = Terminal::default();
        write!(terminal, "\x1b[31mred\x1b[m plain").unwrap();
        terminal.flush().unwrap();
        assert_eq!(terminal.output().to_text(), "red plain");
    }
}
