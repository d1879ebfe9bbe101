use std::{
    fs::{self, OpenOptions},
    io,
    path::PathBuf,
    sync::Mutex,
};

use tracing_subscriber::EnvFilter;

use crate::app::CRATE_NAME;

/// Filter directive, e.g. `QSSH_LOG=debug`. Unset disables logging.
pub const LOG_ENV: &str = "QSSH_LOG";
const LOG_FILE: &str = "qssh.log";

pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(CRATE_NAME).join(LOG_FILE))
}

/// Sends `tracing` events to the log file. The terminal belongs to the picker,
/// so nothing is ever written to stdout or stderr.
pub fn init() -> anyhow::Result<Option<PathBuf>> {
    if std::env::var_os(LOG_ENV).is_none() {
        return Ok(None);
    }
    let filter = EnvFilter::try_from_env(LOG_ENV)?;

    let path = log_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no cache directory"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    Ok(Some(path))
}
