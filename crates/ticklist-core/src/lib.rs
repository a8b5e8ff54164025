//! # ticklist-core — Checklist picker core
//!
//! Everything between the terminal layer and the command line:
//!
//! - **[`checklist`]** — `Checklist` items with a wrapping cursor, loaded from a text file
//! - **[`placeholder`]** — `{name}` token extraction, prompting, and substitution
//! - **[`output`]** — writing the selected lines to the output file
//! - **[`render`]** — full-screen repaint of the list
//! - **[`session`]** — the browse / prompt state machine tying it together
//! - **[`config`]** — paths, preset values, and line style for a session
//! - **[`error`]** — the crate-wide error type

pub mod checklist;
pub mod config;
pub mod error;
pub mod output;
pub mod placeholder;
pub mod render;
pub mod session;

pub use error::Error;
