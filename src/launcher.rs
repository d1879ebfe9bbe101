use std::{
    env,
    ffi::OsString,
    process::{Command, ExitStatus, Stdio},
    thread::sleep,
    time::Duration,
};

use tracing::{error, info};

use crate::error::{Error, Result};
use crate::sshconfig::{SshHost, DEFAULT_PORT};

pub const DEFAULT_SHELL: &str = "sh";
/// Time for the terminal to settle after leaving the alternate screen.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);
/// Loader overrides that break the spawned shell under macOS SIP.
pub const STRIPPED_ENV_PREFIX: &str = "DYLD_";

/// Arguments for `ssh`, leaving out anything the config already defaults.
pub fn ssh_args(host: &SshHost) -> Vec<String> {
    let mut args = Vec::new();
    if !host.user.is_empty() {
        args.push("-l".to_string());
        args.push(host.user.clone());
    }
    if host.port != DEFAULT_PORT {
        args.push("-p".to_string());
        args.push(host.port.clone());
    }
    args.push(host.alias.clone());
    args
}

pub fn shell_command(args: &[String]) -> String {
    let mut command = String::from("ssh");
    for arg in args {
        command.push(' ');
        command.push_str(&shell_quote(arg));
    }
    command
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

pub fn sanitize_env<I>(vars: I) -> Vec<(OsString, OsString)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter(|(key, _)| !key.to_string_lossy().starts_with(STRIPPED_ENV_PREFIX))
        .collect()
}

/// Runs `ssh` through the user's interactive shell so their aliases and functions apply.
pub struct Launcher {
    shell: String,
    env: Vec<(OsString, OsString)>,
    settle_delay: Duration,
}

impl Launcher {
    pub fn new(shell: impl Into<String>, env: Vec<(OsString, OsString)>) -> Self {
        Self {
            shell: shell.into(),
            env,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn from_env() -> Self {
        let shell = env::var("SHELL")
            .ok()
            .filter(|shell| !shell.is_empty())
            .unwrap_or_else(|| DEFAULT_SHELL.to_string());
        Self::new(shell, sanitize_env(env::vars_os()))
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn command(&self, host: &SshHost) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-ic")
            .arg(shell_command(&ssh_args(host)))
            .env_clear()
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Blocks until the ssh session ends and returns its exit status.
    pub fn launch(&self, host: &SshHost) -> Result<ExitStatus> {
        sleep(self.settle_delay);

        let mut cmd = self.command(host);
        info!(shell = %self.shell, alias = %host.alias, "launching ssh");
        let status = cmd.status().map_err(|source| {
            error!(shell = %self.shell, error = %source, "failed to launch ssh");
            Error::Launch {
                shell: self.shell.clone(),
                source,
            }
        })?;

        info!(%status, "ssh exited");
        Ok(status)
    }
}
