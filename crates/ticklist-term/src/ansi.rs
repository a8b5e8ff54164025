// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. The
// checklist repaints the whole screen on every keypress, so this is only
// the handful of sequences a full repaint needs.
//
// Raw mode turns off output post-processing (OPOST), which means `\n` no
// longer implies a carriage return. [`NEWLINE`] is what every rendered row
// must end with.

use std::io::{self, Write};

/// Row terminator for output written while raw mode is active.
pub const NEWLINE: &str = "\r\n";

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Home the cursor and clear the screen. Every repaint starts with this.
#[inline]
pub fn clear_all(w: &mut impl Write) -> io::Result<()> {
    cursor_home(w)?;
    clear_screen(w)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
