use std::{io, path::PathBuf};

use ssh2_config::SshParserError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// Home directory not found, so `~/.ssh/config` cannot be located.
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to read SSH config {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse SSH config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: SshParserError,
    },

    /// Terminal setup, drawing or event reading failed.
    #[error("terminal UI failure")]
    Ui(#[source] io::Error),

    #[error("failed to launch {shell}")]
    Launch {
        shell: String,
        #[source]
        source: io::Error,
    },
}
