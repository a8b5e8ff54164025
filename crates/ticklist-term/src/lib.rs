// SPDX-License-Identifier: MIT
//
// ticklist-term — Terminal layer for ticklist.
//
// Owns everything that touches the terminal at the byte level: entering
// and leaving raw mode (termios on unix, console flags on Windows),
// decoding raw stdin bytes into checklist actions, and the handful of
// ANSI sequences the menu needs to repaint itself.
//
// Nothing above this crate references OS terminal primitives. The
// session in `ticklist-core` only sees the `RawMode` trait and the
// `KeyDecoder`, which is what lets it run against in-memory fakes.

pub mod ansi;
pub mod input;
pub mod terminal;
