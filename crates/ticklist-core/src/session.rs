//! Session controller — the render → read → apply loop.
//!
//! The session owns everything that changes while the menu is up: the
//! checklist, the raw-mode guard, the key decoder, and the screen. Each turn
//! draws the whole list, blocks for one key, and applies it. Nothing happens
//! between keys.
//!
//! # States
//!
//! | State       | Terminal | Entered on                 | Left when               |
//! |-------------|----------|----------------------------|-------------------------|
//! | `Browsing`  | raw      | start, after each prompt   | Enter pressed           |
//! | `Prompting` | cooked   | Enter with unfilled tokens | every value read / fail |
//!
//! Prompting needs cooked mode because placeholder values are typed as whole
//! lines with echo and line editing. Raw mode is re-entered as soon as the
//! prompts finish, before any prompt error is reported, so the session can
//! never be left browsing in cooked mode.
//!
//! # Failures
//!
//! A failed save (nothing selected, prompt cut short, output not writable)
//! is shown as a status line and the user keeps browsing. Anything that
//! breaks the terminal itself (input closed, raw mode lost, screen not
//! writable) ends the session. Either way raw mode is restored before
//! [`Session::run`] returns.

use std::io::{Read, Write};
use std::path::PathBuf;

use ticklist_term::input::{Action, KeyDecoder};
use ticklist_term::terminal::{RawGuard, RawMode};

use crate::checklist::Checklist;
use crate::config::Config;
use crate::error::Error;
use crate::output;
use crate::placeholder::{self, PlaceholderMap};
use crate::render::{self, Frame};

// ---------------------------------------------------------------------------
// State / Step / Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Reading keys in raw mode.
    #[default]
    Browsing,
    /// Reading placeholder values in cooked mode.
    Prompting,
}

/// What the loop does after an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Redraw and read the next key.
    Continue,
    /// Resolve placeholders and write the selection.
    Commit,
    /// Leave without writing.
    Quit,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The selection was written.
    Saved { path: PathBuf, lines: usize },
    /// The user quit without writing.
    Quit,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One interactive checklist session.
///
/// Generic over the raw-mode controller, the key source, and the screen so
/// it can run against a real terminal or entirely in memory.
pub struct Session<M: RawMode, R, W> {
    checklist: Checklist,
    config: Config,
    state: State,

    /// Status line for the next frame. Cleared on the next keypress.
    message: Option<String>,

    /// Terminal width for row truncation, if known.
    width: Option<usize>,

    raw: RawGuard<M>,
    keys: KeyDecoder<R>,
    screen: W,
}

impl<M: RawMode, R: Read, W: Write> Session<M, R, W> {
    pub fn new(checklist: Checklist, config: Config, mode: M, input: R, screen: W) -> Self {
        Self {
            checklist,
            config,
            state: State::Browsing,
            message: None,
            width: None,
            raw: RawGuard::new(mode),
            keys: KeyDecoder::new(input),
            screen,
        }
    }

    /// Cut rows to `width` columns when drawing.
    #[must_use]
    pub fn with_width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn screen(&self) -> &W {
        &self.screen
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> &M {
        self.raw.mode()
    }

    // -- Loop ---------------------------------------------------------------

    /// Run the session until the user saves or quits.
    ///
    /// Enters raw mode first and always restores it before returning.
    ///
    /// # Errors
    ///
    /// [`Error::RawMode`] if raw mode can't be entered (nothing has been
    /// drawn yet) or is lost mid-session, [`Error::Input`] when the key
    /// stream fails or closes, [`Error::Render`] when the screen can't be
    /// written. Recoverable save errors never escape this function.
    pub fn run(&mut self) -> Result<Outcome, Error> {
        self.raw.enter().map_err(Error::RawMode)?;
        tracing::debug!(items = self.checklist.len(), "session started");

        let result = self.run_loop();

        match (result, self.raw.leave()) {
            (Ok(outcome), Ok(())) => {
                tracing::debug!(?outcome, "session finished");
                Ok(outcome)
            }
            (Ok(_), Err(e)) => Err(Error::RawMode(e)),
            (Err(err), restored) => {
                if let Err(e) = restored {
                    tracing::warn!(error = %e, "terminal restore failed");
                }
                tracing::error!(error = %err, "session aborted");
                Err(err)
            }
        }
    }

    fn run_loop(&mut self) -> Result<Outcome, Error> {
        loop {
            self.draw()?;
            let action = self.keys.decode().map_err(Error::Input)?;

            match self.apply(action) {
                Step::Continue => {}
                Step::Quit => return Ok(Outcome::Quit),
                Step::Commit => match self.commit() {
                    Ok(lines) => {
                        return Ok(Outcome::Saved {
                            path: self.config.output.clone(),
                            lines,
                        });
                    }
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!(error = %e, "save failed");
                        self.message = Some(e.to_string());
                    }
                    Err(e) => return Err(e),
                },
            }
        }
    }

    fn draw(&mut self) -> Result<(), Error> {
        let frame = Frame {
            source: &self.config.source,
            output: &self.config.output,
            message: self.message.as_deref(),
            width: self.width,
        };
        render::render(&mut self.screen, &self.checklist, &frame).map_err(Error::Render)
    }

    // -- Transitions --------------------------------------------------------

    /// Apply one decoded key to the checklist.
    ///
    /// Any key clears the status line. Out-of-range direct toggles are
    /// ignored.
    pub fn apply(&mut self, action: Action) -> Step {
        tracing::trace!(?action, "key");
        self.message = None;

        match action {
            Action::None => {}
            Action::MoveUp => self.checklist.move_up(),
            Action::MoveDown => self.checklist.move_down(),
            Action::ToggleActive => self.checklist.toggle_active(),
            Action::ToggleAt(index) => {
                self.checklist.toggle_at(index);
            }
            Action::Commit => return Step::Commit,
            Action::Quit => return Step::Quit,
        }
        Step::Continue
    }

    // -- Commit -------------------------------------------------------------

    /// Resolve placeholders in the selected lines and write them out.
    ///
    /// Returns the number of lines written.
    fn commit(&mut self) -> Result<usize, Error> {
        let selected = self.checklist.selected_texts();
        let keys = placeholder::extract_keys(&selected);

        let values = if placeholder::missing(&keys, &self.config.known).is_empty() {
            self.config.known.clone()
        } else {
            self.prompt_for(&keys)?
        };

        let lines = placeholder::substitute(&selected, &values);
        output::write_lines(&lines, &self.config.output, self.config.style)?;
        Ok(lines.len())
    }

    /// Suspend raw mode, read the missing values, resume raw mode.
    fn prompt_for(&mut self, keys: &[String]) -> Result<PlaceholderMap, Error> {
        self.state = State::Prompting;
        if let Err(e) = self.raw.leave() {
            self.state = State::Browsing;
            return Err(Error::RawMode(e));
        }
        tracing::debug!(count = keys.len(), "prompting for placeholders");

        let resolved = placeholder::resolve(
            keys,
            &self.config.known,
            self.keys.reader_mut(),
            &mut self.screen,
        );

        let resumed = self.raw.enter();
        self.state = State::Browsing;
        resumed.map_err(Error::RawMode)?;
        resolved
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
