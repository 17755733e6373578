#![no_main]

use ansi_lines::parser::{Action, Parser};
use ansi_lines::Terminal;
use libfuzzer_sys::fuzz_target;

/// Merge neighbouring prints so differently chunked runs can be compared
fn coalesce(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::new();
    for action in actions {
        match (out.last_mut(), action) {
            (Some(Action::Print(prev)), Action::Print(data)) => prev.extend_from_slice(&data),
            (_, action) => out.push(action),
        }
    }
    out
}

fuzz_target!(|data: &[u8]| {
    // Feed the data to the parser - it should never panic
    let whole = Parser::new().parse(data);

    // Splitting at the first byte's value must decode the same stream
    let split = data.first().map_or(0, |b| *b as usize).min(data.len());
    let mut parser = Parser::new();
    let mut chunked = parser.parse(&data[..split]);
    chunked.extend(parser.parse(&data[split..]));
    assert_eq!(coalesce(whole), coalesce(chunked));

    // Rendering must never panic either
    let mut terminal = Terminal::default();
    assert!(terminal.feed(data).is_ok());
});
