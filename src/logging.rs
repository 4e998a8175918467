//! Log output setup.
//!
//! The terminal belongs to the user interface, so logs only go to a file and only when one was
//! asked for.

use std::{fs::File, path::Path, sync::Mutex};

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Installs the global log subscriber writing to `path`.
///
/// Without a path this does nothing. The level filter is read from `RUST_LOG` and falls back to
/// `info`.
///
/// # Errors
///
/// This function may return errors if:
/// - The log file cannot be created
/// - A global subscriber was already installed
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}
