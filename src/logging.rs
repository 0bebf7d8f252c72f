//! File-backed tracing setup. The terminal belongs to the TUI, so log lines go
//! to `~/.moviestar/moviestar.log` instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DATA_DIR_NAME: &str = ".moviestar";
const LOG_FILE_NAME: &str = "moviestar.log";
const DEFAULT_FILTER: &str = "moviestar=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
/// Returns the path being written to.
pub fn init() -> Result<PathBuf> {
    let path = log_path()?;
    let file = open_log_file(&path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(path)
}

/// Absolute path of the log file inside the user's home.
fn log_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}

/// Open `path` for appending, creating its directory first.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_created_with_its_directory_and_appended_to() {
        let dir = std::env::temp_dir().join(format!("moviestar-log-{}", std::process::id()));
        let path = dir.join("nested").join(LOG_FILE_NAME);

        let mut first = open_log_file(&path).unwrap();
        writeln!(first, "one").unwrap();
        drop(first);
        let mut second = open_log_file(&path).unwrap();
        writeln!(second, "two").unwrap();
        drop(second);

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
