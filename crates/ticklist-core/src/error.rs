//! Error taxonomy for a checklist session.
//!
//! Every failure the session can hit is one [`Error`] variant. What matters
//! to the session loop is not the cause but whether it can keep going:
//! [`Error::is_recoverable`] separates failures that only abort the current
//! save (shown as a status message, back to browsing) from those that end
//! the session.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The checklist file could not be opened or read.
    #[error("open checklist {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The checklist file has no non-blank lines.
    #[error("checklist {} is empty", path.display())]
    Empty { path: PathBuf },

    /// Reading a key failed or the input stream closed.
    #[error("read input: {0}")]
    Input(#[source] io::Error),

    /// Raw mode could not be entered or left.
    #[error("raw mode: {0}")]
    RawMode(#[source] io::Error),

    /// Drawing the menu to the terminal failed.
    #[error("render: {0}")]
    Render(#[source] io::Error),

    /// Reading a placeholder value failed.
    #[error("read placeholder {key:?}: {source}")]
    Prompt {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Commit with nothing selected.
    #[error("no items selected")]
    NoSelection,

    /// The output file could not be created or written.
    #[error("write output {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether the session can return to browsing after this error.
    ///
    /// Only failures inside a commit are recoverable; the user can fix the
    /// selection (or the output location) and press Enter again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Prompt { .. } | Self::NoSelection | Self::Write { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_failures_are_recoverable() {
        assert!(Error::NoSelection.is_recoverable());
        assert!(
            Error::Prompt {
                key: "who".into(),
                source: io::Error::other("eof"),
            }
            .is_recoverable()
        );
        assert!(
            Error::Write {
                path: "out.txt".into(),
                source: io::Error::other("denied"),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn session_failures_are_fatal() {
        assert!(!Error::Input(io::Error::other("closed")).is_recoverable());
        assert!(!Error::RawMode(io::Error::other("no tty")).is_recoverable());
        assert!(!Error::Render(io::Error::other("broken pipe")).is_recoverable());
        assert!(!Error::Empty { path: "c.txt".into() }.is_recoverable());
    }

    #[test]
    fn messages_are_single_line() {
        let err = Error::Load {
            path: "missing.txt".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "open checklist missing.txt: not found");

        let err = Error::Prompt {
            key: "who".into(),
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "input stream closed"),
        };
        assert_eq!(err.to_string(), "read placeholder \"who\": input stream closed");
        assert_eq!(Error::NoSelection.to_string(), "no items selected");
    }
}
