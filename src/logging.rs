//! Log setup.
//!
//! The console draws on stdout, so logs go to a file instead. Verbosity
//! follows `RUST_LOG` and defaults to [`DEFAULT_FILTER`].

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "keyfetch=info";

/// Install the global subscriber, appending to the file at `path`.
///
/// Fails if the file cannot be opened or a subscriber is already installed.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("cannot install log subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_to_the_log_file_and_refuses_a_second_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyfetch.log");

        init(&path).unwrap();
        tracing::warn!("disk check");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("disk check"), "log was: {contents}");

        assert!(init(&path).is_err());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let err = init(dir.path()).unwrap_err();
        assert!(err.to_string().contains("cannot open log file"), "{err}");
    }
}
