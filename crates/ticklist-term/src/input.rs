// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into checklist actions. One call to
// [`KeyDecoder::decode`] consumes exactly one logical key: a single byte
// for everything except the arrow keys, which arrive as the three-byte
// `ESC [ A|B|C|D` sequences.
//
// # Escape ambiguity
//
// A bare ESC could be the Escape key or the first byte of an arrow key.
// In raw mode with VMIN=1 the terminal hands over a whole arrow sequence
// in one read, so when ESC is pulled from the buffer the rest of the
// sequence is already sitting behind it. The decoder only looks at what
// is buffered and never blocks waiting for a follow-up byte. No follow-up,
// or one it doesn't recognize, and ESC means quit.
//
// # Direct addressing
//
// Digits `1`–`9` toggle items 0–8, letters toggle items 9 onward,
// case-insensitively. Letters claimed by other bindings (`j`, `k`, `q`,
// `x`) win over addressing. [`label_for`] is the inverse mapping used when
// the list is drawn, so what's on screen and what's typed always agree.

use std::io::{self, BufRead, BufReader, Read};

// ─── Action ─────────────────────────────────────────────────────────────────

/// The decoded meaning of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Unbound key — nothing happens.
    #[default]
    None,
    /// Up arrow, left arrow, or `k`.
    MoveUp,
    /// Down arrow, right arrow, or `j`.
    MoveDown,
    /// Space or `x` — toggle the item under the cursor.
    ToggleActive,
    /// Digit or letter — toggle the item at this 0-based index.
    ToggleAt(usize),
    /// Enter — write the selection.
    Commit,
    /// `q`, Ctrl+C, or Escape — leave without writing.
    Quit,
}

// ─── Byte Table ─────────────────────────────────────────────────────────────

const CTRL_C: u8 = 0x03;
const ESC: u8 = 0x1B;

/// Number of items reachable with the digit keys `1`–`9`.
pub const DIGIT_TARGETS: usize = 9;

/// Number of items reachable with a single keystroke (digits + letters).
pub const DIRECT_TARGETS: usize = DIGIT_TARGETS + 26;

/// Decode a single byte that is not the start of an escape sequence.
///
/// Bindings are checked in priority order: quit, toggle, commit,
/// vi-style navigation, then direct addressing.
#[must_use]
pub const fn decode_byte(byte: u8) -> Action {
    match byte {
        b'q' | b'Q' | CTRL_C => Action::Quit,
        b' ' | b'x' | b'X' => Action::ToggleActive,
        b'\r' | b'\n' => Action::Commit,
        ESC => Action::Quit,
        b'k' => Action::MoveUp,
        b'j' => Action::MoveDown,
        _ => match index_for_key(byte) {
            Some(index) => Action::ToggleAt(index),
            None => Action::None,
        },
    }
}

/// Decode the bytes buffered behind an ESC.
///
/// Returns the action and how many of `pending` belong to the sequence.
/// `ESC [` followed by anything consumes both follow-up bytes, even when
/// the terminator isn't an arrow.
#[must_use]
pub const fn decode_escape(pending: &[u8]) -> (Action, usize) {
    match pending {
        [b'[', b'A' | b'D', ..] => (Action::MoveUp, 2),
        [b'[', b'B' | b'C', ..] => (Action::MoveDown, 2),
        [b'[', _, ..] => (Action::Quit, 2),
        _ => (Action::Quit, 0),
    }
}

/// Map a direct-addressing key to its 0-based item index.
///
/// `1`–`9` → 0–8, `a`–`z` / `A`–`Z` → 9–34. Does not know about the
/// bindings that shadow some letters; use [`decode_byte`] for that.
#[must_use]
pub const fn index_for_key(byte: u8) -> Option<usize> {
    match byte {
        b'1'..=b'9' => Some((byte - b'1') as usize),
        b'a'..=b'z' => Some(DIGIT_TARGETS + (byte - b'a') as usize),
        b'A'..=b'Z' => Some(DIGIT_TARGETS + (byte - b'A') as usize),
        _ => None,
    }
}

/// The on-screen label for the item at `index`.
///
/// `1`–`9` for the first nine items, then `a`–`z`. Items past
/// [`DIRECT_TARGETS`] have no label.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // index < DIRECT_TARGETS fits in u8.
pub const fn label_for(index: usize) -> Option<char> {
    if index < DIGIT_TARGETS {
        Some((b'1' + index as u8) as char)
    } else if index < DIRECT_TARGETS {
        Some((b'a' + (index - DIGIT_TARGETS) as u8) as char)
    } else {
        None
    }
}

// ─── KeyDecoder ─────────────────────────────────────────────────────────────

/// Blocking key reader over any byte source.
///
/// Wraps the source in a [`BufReader`] so escape sequences can be resolved
/// from what's already buffered. The same buffer is used for line-oriented
/// prompts (see [`reader_mut`](Self::reader_mut)), so no keystrokes are
/// lost when the session switches between raw and cooked input.
///
/// # Example
///
/// ```
/// use ticklist_term::input::{Action, KeyDecoder};
///
/// let mut keys = KeyDecoder::new(&b"j\x1b[A5"[..]);
/// assert_eq!(keys.decode()?, Action::MoveDown);
/// assert_eq!(keys.decode()?, Action::MoveUp);
/// assert_eq!(keys.decode()?, Action::ToggleAt(4));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct KeyDecoder<R> {
    reader: BufReader<R>,
}

impl<R: Read> KeyDecoder<R> {
    /// Create a decoder reading from `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// Block until one key is available and decode it.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] when the stream is closed,
    /// or the underlying read error.
    pub fn decode(&mut self) -> io::Result<Action> {
        let byte = self.read_byte()?;

        if byte == ESC {
            let (action, consumed) = decode_escape(self.reader.buffer());
            self.reader.consume(consumed);
            return Ok(action);
        }

        Ok(decode_byte(byte))
    }

    /// The buffered reader, for line-oriented reads between keys.
    pub const fn reader_mut(&mut self) -> &mut BufReader<R> {
        &mut self.reader
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        loop {
            let byte = match self.reader.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            return match byte {
                Some(b) => {
                    self.reader.consume(1);
                    Ok(b)
                }
                None => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input stream closed",
                )),
            };
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Decode every key in `bytes` until the stream runs dry.
    fn decode_all(bytes: &[u8]) -> Vec<Action> {
        let mut keys = KeyDecoder::new(bytes);
        let mut actions = Vec::new();
        loop {
            match keys.decode() {
                Ok(action) => actions.push(action),
                Err(e) => {
                    assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
                    return actions;
                }
            }
        }
    }

    fn decode_one(bytes: &[u8]) -> Action {
        let actions = decode_all(bytes);
        assert_eq!(actions.len(), 1, "expected one action from {bytes:?}");
        actions[0]
    }

    // ── Quit ─────────────────────────────────────────────────────────────

    #[test]
    fn quit_keys() {
        assert_eq!(decode_one(b"q"), Action::Quit);
        assert_eq!(decode_one(b"Q"), Action::Quit);
        assert_eq!(decode_one(b"\x03"), Action::Quit);
    }

    #[test]
    fn lone_escape_quits() {
        assert_eq!(decode_one(b"\x1b"), Action::Quit);
    }

    #[test]
    fn escape_with_unknown_follow_up_quits_and_keeps_follow_up() {
        // The byte after ESC isn't part of an arrow, so it is decoded on
        // its own on the next call.
        assert_eq!(decode_all(b"\x1bx"), [Action::Quit, Action::ToggleActive]);
    }

    #[test]
    fn escape_bracket_unknown_terminator_consumes_sequence() {
        assert_eq!(decode_all(b"\x1b[Zj"), [Action::Quit, Action::MoveDown]);
    }

    #[test]
    fn escape_bracket_without_terminator_quits() {
        assert_eq!(decode_all(b"\x1b["), [Action::Quit, Action::None]);
    }

    // ── Toggle / commit ──────────────────────────────────────────────────

    #[test]
    fn toggle_active_keys() {
        assert_eq!(decode_one(b" "), Action::ToggleActive);
        assert_eq!(decode_one(b"x"), Action::ToggleActive);
        assert_eq!(decode_one(b"X"), Action::ToggleActive);
    }

    #[test]
    fn commit_keys() {
        assert_eq!(decode_one(b"\r"), Action::Commit);
        assert_eq!(decode_one(b"\n"), Action::Commit);
    }

    // ── Navigation ───────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            [
                Action::MoveUp,
                Action::MoveDown,
                Action::MoveDown,
                Action::MoveUp
            ]
        );
    }

    #[test]
    fn vi_keys() {
        assert_eq!(decode_one(b"k"), Action::MoveUp);
        assert_eq!(decode_one(b"j"), Action::MoveDown);
    }

    #[test]
    fn uppercase_vi_keys_are_addressing() {
        assert_eq!(decode_one(b"K"), Action::ToggleAt(19));
        assert_eq!(decode_one(b"J"), Action::ToggleAt(18));
    }

    // ── Direct addressing ────────────────────────────────────────────────

    #[test]
    fn digits() {
        assert_eq!(decode_one(b"1"), Action::ToggleAt(0));
        assert_eq!(decode_one(b"5"), Action::ToggleAt(4));
        assert_eq!(decode_one(b"9"), Action::ToggleAt(8));
    }

    #[test]
    fn zero_is_unbound() {
        assert_eq!(decode_one(b"0"), Action::None);
    }

    #[test]
    fn letters() {
        assert_eq!(decode_one(b"a"), Action::ToggleAt(9));
        assert_eq!(decode_one(b"b"), Action::ToggleAt(10));
        assert_eq!(decode_one(b"z"), Action::ToggleAt(34));
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(decode_one(b"B"), Action::ToggleAt(10));
        assert_eq!(decode_one(b"Z"), Action::ToggleAt(34));
    }

    #[test]
    fn shadowed_letters_keep_their_binding() {
        assert_eq!(decode_one(b"q"), Action::Quit);
        assert_eq!(decode_one(b"x"), Action::ToggleActive);
        assert_eq!(decode_one(b"k"), Action::MoveUp);
        assert_eq!(decode_one(b"j"), Action::MoveDown);
    }

    #[test]
    fn unbound_bytes() {
        for &b in b"0-=/\t\x7f" {
            assert_eq!(decode_byte(b), Action::None, "byte {b:#04x}");
        }
        assert_eq!(decode_byte(0xC3), Action::None);
    }

    // ── Labels ───────────────────────────────────────────────────────────

    #[test]
    fn labels() {
        assert_eq!(label_for(0), Some('1'));
        assert_eq!(label_for(8), Some('9'));
        assert_eq!(label_for(9), Some('a'));
        assert_eq!(label_for(10), Some('b'));
        assert_eq!(label_for(34), Some('z'));
        assert_eq!(label_for(35), None);
    }

    #[test]
    fn labels_round_trip_through_addressing() {
        for index in 0..DIRECT_TARGETS {
            let label = label_for(index).unwrap();
            assert_eq!(index_for_key(label as u8), Some(index));
        }
    }

    // ── Stream handling ──────────────────────────────────────────────────

    #[test]
    fn empty_stream_is_eof() {
        let mut keys = KeyDecoder::new(&b""[..]);
        let err = keys.decode().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_error_propagates() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("gone"))
            }
        }
        let mut keys = KeyDecoder::new(Broken);
        let err = keys.decode().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn line_reads_share_the_key_buffer() {
        let mut keys = KeyDecoder::new(&b"\rbob\nj"[..]);
        assert_eq!(keys.decode().unwrap(), Action::Commit);

        let mut line = String::new();
        keys.reader_mut().read_line(&mut line).unwrap();
        assert_eq!(line, "bob\n");

        assert_eq!(keys.decode().unwrap(), Action::MoveDown);
    }
}
