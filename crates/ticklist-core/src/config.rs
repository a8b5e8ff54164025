//! Session configuration.
//!
//! Everything the session needs to know before the first key is read. The
//! binary builds a [`Config`] from its command line; tests build one
//! directly.
//!
//! # Pre-set placeholder values
//!
//! `KEY=VALUE` assignments (see [`parse_assignment`]) seed the placeholder
//! map, so those keys are filled in without a prompt. The split is on the
//! first `=`, which means values may contain `=` but keys may not.

use std::path::PathBuf;

use crate::placeholder::PlaceholderMap;

/// Default checklist file, relative to the working directory.
pub const DEFAULT_INPUT: &str = "checklist.txt";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "selected.txt";

/// How each line is laid out in the output file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// The line exactly as resolved.
    #[default]
    Plain,
    /// `- ` before every line, for pasting into markdown lists.
    Bullet,
}

impl LineStyle {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Bullet => "- ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Checklist file to read items from.
    pub source: PathBuf,
    /// File the selection is written to.
    pub output: PathBuf,
    /// Placeholder values known before the session starts.
    pub known: PlaceholderMap,
    pub style: LineStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            known: PlaceholderMap::new(),
            style: LineStyle::Plain,
        }
    }
}

/// Parse a `KEY=VALUE` assignment.
///
/// # Errors
///
/// Returns a message if there is no `=`, the key is empty, or the key
/// contains a brace (it could never match a token).
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got {raw:?}"));
    };
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    if key.contains(['{', '}']) {
        return Err(format!("key {key:?} must not contain braces"));
    }
    Ok((key.to_owned(), value.to_owned()))
}
