//! Output writer — the selected lines, one per line, to a file.
//!
//! The empty check comes first so that committing with nothing selected
//! never creates or truncates the target file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::LineStyle;
use crate::error::Error;

/// Write `lines` to `path`, each followed by `\n`, replacing any existing
/// file.
///
/// # Errors
///
/// [`Error::NoSelection`] if `lines` is empty (nothing is touched on disk),
/// [`Error::Write`] if the file can't be created, written, or flushed.
pub fn write_lines(lines: &[String], path: &Path, style: LineStyle) -> Result<(), Error> {
    if lines.is_empty() {
        return Err(Error::NoSelection);
    }

    let to_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}{line}", style.prefix()).map_err(to_error)?;
    }
    writer.flush().map_err(to_error)?;

    tracing::info!(path = %path.display(), lines = lines.len(), "selection written");
    Ok(())
}
