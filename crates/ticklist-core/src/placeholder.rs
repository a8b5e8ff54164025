//! Placeholder tokens — `{name}` markers filled in at save time.
//!
//! Three steps, run in order on the selected lines when the user commits:
//!
//! 1. [`extract_keys`] finds every distinct token name, first-seen order.
//! 2. [`resolve`] asks for each name that has no value yet and returns the
//!    complete map. It takes the known values by reference and hands back a
//!    new map, so nothing is mutated behind the caller's back.
//! 3. [`substitute`] rewrites the lines. Tokens without a value stay as
//!    they are.
//!
//! A token name is one or more characters that aren't braces: `{a b}` is a
//! token named `a b`, `{}` is not a token, and `{{x}}` holds the token `x`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Write};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::Error;

/// Resolved placeholder values, by token name.
pub type PlaceholderMap = HashMap<String, String>;

/// `{name}` with the name in group 1.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("token pattern is valid"));

/// Every distinct token name across `lines`, in first-seen order.
#[must_use]
pub fn extract_keys<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for line in lines {
        for caps in TOKEN.captures_iter(line.as_ref()) {
            let key = &caps[1];
            if seen.insert(key.to_owned()) {
                keys.push(key.to_owned());
            }
        }
    }

    keys
}

/// Keys from `keys` that have no value in `known`.
#[must_use]
pub fn missing<'k>(keys: &'k [String], known: &PlaceholderMap) -> Vec<&'k str> {
    keys.iter()
        .map(String::as_str)
        .filter(|key| !known.contains_key(*key))
        .collect()
}

/// Prompt for every key without a value and return the merged map.
///
/// Writes `Enter value for <key>: ` to `out` and reads one line from
/// `input` per missing key. The trailing line break is stripped; the rest
/// of the line is kept as typed. Must be called with the terminal in cooked
/// mode so the user gets echo and line editing.
///
/// # Errors
///
/// [`Error::Prompt`] naming the key being asked for when writing the prompt
/// or reading the answer fails, including end of input.
pub fn resolve(
    keys: &[String],
    known: &PlaceholderMap,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<PlaceholderMap, Error> {
    let mut values = known.clone();

    for key in missing(keys, known) {
        let value = prompt(key, input, out).map_err(|source| Error::Prompt {
            key: key.to_owned(),
            source,
        })?;
        tracing::debug!(key, "placeholder resolved");
        values.insert(key.to_owned(), value);
    }

    Ok(values)
}

fn prompt(key: &str, input: &mut impl BufRead, out: &mut impl Write) -> std::io::Result<String> {
    write!(out, "Enter value for {key}: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input stream closed",
        ));
    }

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Replace every `{key}` that has a value in `values`.
///
/// Unknown tokens are left verbatim. With an empty map the input is
/// returned borrowed, untouched.
#[must_use]
pub fn substitute<'a>(lines: &'a [String], values: &PlaceholderMap) -> Cow<'a, [String]> {
    if values.is_empty() {
        return Cow::Borrowed(lines);
    }

    let replace = |caps: &Captures<'_>| -> String {
        values
            .get(&caps[1])
            .map_or_else(|| caps[0].to_owned(), Clone::clone)
    };

    Cow::Owned(
        lines
            .iter()
            .map(|line| TOKEN.replace_all(line, &replace).into_owned())
            .collect(),
    )
}
