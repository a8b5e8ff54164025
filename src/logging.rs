// SPDX-License-Identifier: MIT
//
// Log setup. The terminal is the UI, so log lines only ever go to a file,
// and only when one was asked for with `--log-file`.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Build a subscriber that writes plain-text events to `file`.
pub fn build_subscriber(file: File, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

/// Install the global subscriber, truncating `path`.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    build_subscriber(file, env_filter()).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn events_reach_the_file() {
        let log = tempfile::NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log.reopen().unwrap(), EnvFilter::new("debug"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(items = 3, "checklist loaded");
        });

        let text = fs::read_to_string(log.path()).unwrap();
        assert!(text.contains("checklist loaded"));
        assert!(text.contains("items=3"));
    }

    #[test]
    fn filter_drops_lower_levels() {
        let log = tempfile::NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log.reopen().unwrap(), EnvFilter::new("warn"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("quiet");
            tracing::warn!("loud");
        });

        let text = fs::read_to_string(log.path()).unwrap();
        assert!(!text.contains("quiet"));
        assert!(text.contains("loud"));
    }

    #[test]
    fn init_fails_for_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init(&dir.path().join("missing/dir/log.txt")).is_err());
    }
}
