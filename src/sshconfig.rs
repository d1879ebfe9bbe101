use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use ssh2_config::{ParseRule, SshConfig, SshParserError};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: &str = "22";
const WILDCARD: &str = "*";

/// One connectable destination from the SSH config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SshHost {
    pub alias: String,
    pub hostname: String,
    /// Empty means the ssh client picks the login user.
    pub user: String,
    pub port: String,
}

/// `~/.ssh/config`.
pub fn default_config_path() -> Result<PathBuf> {
    expand_tilde("~/.ssh/config")
}

/// Expands a leading `~` to the home directory. Other paths are returned as is.
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

pub fn retrieve_ssh_hosts<P: AsRef<Path>>(path: P) -> Result<Vec<SshHost>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;

    let hosts =
        parse_ssh_hosts(&mut BufReader::new(file)).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), count = hosts.len(), "loaded ssh hosts");
    Ok(hosts)
}

pub fn parse_ssh_hosts(reader: &mut impl BufRead) -> Result<Vec<SshHost>, SshParserError> {
    let config = SshConfig::default().parse(reader, ParseRule::ALLOW_UNKNOWN_FIELDS)?;

    let mut datas = Vec::new();
    for host in config.get_hosts() {
        for clause in host.pattern.iter() {
            let alias = clause.pattern.as_str();
            if alias == WILDCARD || clause.negated || alias.is_empty() {
                continue;
            }

            // values are resolved across every block matching the alias, not just this one
            let params = config.query(alias);
            let hostname = params.host_name.unwrap_or_default();
            // if hostname is not set, we can't connect to it
            if hostname.is_empty() {
                debug!(alias, "skipping host without HostName");
                continue;
            }

            datas.push(SshHost {
                alias: alias.to_string(),
                hostname,
                user: params.user.unwrap_or_default(),
                port: params
                    .port
                    .map(|port| port.to_string())
                    .unwrap_or_else(|| DEFAULT_PORT.to_string()),
            });
        }
    }

    Ok(datas)
}
