//! UTF-8 boundary detection for the streaming parser
//!
//! The parser never splits a multi-byte character across two `Print`
//! actions. Before scanning, it asks how many trailing bytes of the input
//! belong to a character that has not fully arrived yet, and holds those back.

/// Longest UTF-8 encoding of a single character
pub const MAX_CHAR_LEN: usize = 4;

/// Expected encoded length for a lead byte, or `None` for continuation and
/// invalid bytes.
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/// Number of trailing bytes in `input` that start a character whose
/// remaining bytes are not present yet.
///
/// Only the last `MAX_CHAR_LEN - 1` bytes are inspected. Invalid sequences are
/// never held back; they pass through as ordinary bytes.
pub fn incomplete_tail(input: &[u8]) -> usize {
    let window = input.len().min(MAX_CHAR_LEN - 1);
    for back in 1..=window {
        let byte = input[input.len() - back];
        if byte & 0xC0 == 0x80 {
            // continuation byte, keep walking towards the lead
            continue;
        }
        return match sequence_len(byte) {
            Some(len) if len > back => back,
            _ => 0,
        };
    }
    0
}
