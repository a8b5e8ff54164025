//! Screen rendering — one full repaint per keypress.
//!
//! The frame is assembled in memory and written with a single `write_all`,
//! so the terminal never shows a half-drawn list. Every row ends in CR LF
//! because raw mode disables output post-processing.
//!
//! Row layout:
//!
//! ```text
//! >-[x] 1.Buy milk
//!  -[ ] 2.Call {who}
//! ```
//!
//! cursor marker, check box, then the direct-toggle label (the same key
//! that toggles the row) and the item text.

use std::io::{self, Write};
use std::path::Path;

use ticklist_term::ansi::{self, NEWLINE};
use ticklist_term::input::label_for;
use unicode_width::UnicodeWidthChar;

use crate::checklist::{Checklist, ChecklistItem};

const TITLE: &str = "Interactive checklist";

const HINTS: [&str; 2] = [
    "Use \u{2191}/\u{2193} to move, space to toggle, digits/letters to toggle an item directly,",
    "Enter to save, q or Esc to quit.",
];

/// Everything a frame shows besides the list itself.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    /// Status line shown above the list (e.g. why the last save failed).
    pub message: Option<&'a str>,
    /// Terminal width in columns, if known. Rows are cut to fit.
    pub width: Option<usize>,
}

/// Format one checklist row, without a line terminator.
#[must_use]
pub fn format_row(index: usize, item: &ChecklistItem, active: bool) -> String {
    let cursor = if active { '>' } else { ' ' };
    let check = if item.selected { 'x' } else { ' ' };
    let mut row = String::with_capacity(item.text.len() + 8);
    row.push(cursor);
    row.push_str("-[");
    row.push(check);
    row.push_str("] ");
    if let Some(label) = label_for(index) {
        row.push(label);
    }
    row.push('.');
    row.push_str(&item.text);
    row
}

/// Cut `text` so its display width is at most `width` columns.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[..i];
        }
    }
    text
}

/// Clear the screen and draw the header and every row.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render(w: &mut impl Write, list: &Checklist, frame: &Frame<'_>) -> io::Result<()> {
    let mut out = Vec::with_capacity(256 + list.len() * 32);
    ansi::clear_all(&mut out)?;

    let mut text = String::new();
    let mut line = |s: &str| {
        let s = frame.width.map_or(s, |w| truncate_to_width(s, w));
        text.push_str(s);
        text.push_str(NEWLINE);
    };

    line(TITLE);
    line(&format!("Source: {}", frame.source.display()));
    line(&format!("Output: {}", frame.output.display()));
    for hint in HINTS {
        line(hint);
    }
    line("");
    if let Some(message) = frame.message {
        line(&format!("! {message}"));
        line("");
    }
    for (index, item) in list.items().iter().enumerate() {
        line(&format_row(index, item, index == list.active()));
    }

    out.extend_from_slice(text.as_bytes());
    w.write_all(&out)?;
    w.flush()
}

/// Write a one-line notice, for messages printed outside the repaint cycle.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn notice(w: &mut impl Write, message: &str) -> io::Result<()> {
    w.write_all(message.as_bytes())?;
    w.write_all(NEWLINE.as_bytes())?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame<'a>(message: Option<&'a str>, width: Option<usize>) -> Frame<'a> {
        Frame {
            source: Path::new("checklist.txt"),
            output: Path::new("selected.txt"),
            message,
            width,
        }
    }

    fn draw(list: &Checklist, frame: &Frame<'_>) -> String {
        let mut buf = Vec::new();
        render(&mut buf, list, frame).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// The rendered rows after the header, with terminators stripped.
    fn rows(screen: &str) -> Vec<&str> {
        screen
            .split(NEWLINE)
            .filter(|l| l.contains("-["))
            .collect()
    }

    // ── Rows ────────────────────────────────────────────────────────────

    #[test]
    fn row_layout() {
        let mut item = ChecklistItem::new("Buy milk");
        assert_eq!(format_row(0, &item, true), ">-[ ] 1.Buy milk");
        item.selected = true;
        assert_eq!(format_row(1, &item, false), " -[x] 2.Buy milk");
    }

    #[test]
    fn labels_switch_to_letters_after_nine() {
        let item = ChecklistItem::new("t");
        assert_eq!(format_row(9, &item, false), " -[ ] a.t");
        assert_eq!(format_row(10, &item, false), " -[ ] b.t");
    }

    #[test]
    fn rows_past_the_alphabet_have_no_label() {
        let item = ChecklistItem::new("t");
        assert_eq!(format_row(35, &item, false), " -[ ] .t");
    }

    // ── Frame ───────────────────────────────────────────────────────────

    #[test]
    fn frame_starts_with_clear() {
        let list = Checklist::parse("a").unwrap();
        assert!(draw(&list, &frame(None, None)).starts_with("\x1b[H\x1b[2J"));
    }

    #[test]
    fn frame_shows_paths_and_hints() {
        let list = Checklist::parse("a").unwrap();
        let screen = draw(&list, &frame(None, None));
        assert!(screen.contains("Source: checklist.txt\r\n"));
        assert!(screen.contains("Output: selected.txt\r\n"));
        assert!(screen.contains("Enter to save, q or Esc to quit."));
    }

    #[test]
    fn frame_marks_cursor_and_selection() {
        let mut list = Checklist::parse("a\nb\nc").unwrap();
        list.move_down();
        list.toggle_at(2);
        let screen = draw(&list, &frame(None, None));
        assert_eq!(rows(&screen), [" -[ ] 1.a", ">-[ ] 2.b", " -[x] 3.c"]);
    }

    #[test]
    fn every_line_uses_crlf() {
        let list = Checklist::parse("a\nb").unwrap();
        let screen = draw(&list, &frame(Some("oops"), None));
        let bare_lf = screen
            .match_indices('\n')
            .filter(|(i, _)| *i == 0 || screen.as_bytes()[i - 1] != b'\r')
            .count();
        assert_eq!(bare_lf, 0);
    }

    #[test]
    fn message_appears_above_list() {
        let list = Checklist::parse("a").unwrap();
        let screen = draw(&list, &frame(Some("no items selected"), None));
        let msg = screen.find("! no items selected").unwrap();
        let row = screen.find(">-[ ] 1.a").unwrap();
        assert!(msg < row);
    }

    #[test]
    fn rows_are_cut_to_width() {
        let list = Checklist::parse("a very long checklist entry").unwrap();
        let screen = draw(&list, &frame(None, Some(12)));
        assert_eq!(rows(&screen), [">-[ ] 1.a ve"]);
    }

    // ── Width ───────────────────────────────────────────────────────────

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn truncate_wide_chars_by_columns() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_to_width("日本語", 4), "日本");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
    }

    #[test]
    fn notice_ends_with_crlf() {
        let mut buf = Vec::new();
        notice(&mut buf, "hi").unwrap();
        assert_eq!(buf, b"hi\r\n");
    }
}
