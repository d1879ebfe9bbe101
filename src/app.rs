use std::{path::PathBuf, process::ExitStatus};

use tracing::info;

use crate::error::Result;
use crate::launcher::Launcher;
use crate::select_box::{CrosstermEvents, SelectBox};
use crate::sshconfig::{retrieve_ssh_hosts, SshHost};
use crate::terminal::Terminal;

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

pub struct App {
    config_path: PathBuf,
    launcher: Launcher,
}

impl App {
    pub fn new(config_path: PathBuf, launcher: Launcher) -> Self {
        App {
            config_path,
            launcher,
        }
    }

    /// Picks a host and connects to it. `None` means the user quit without picking.
    pub fn run(&self) -> Result<Option<ExitStatus>> {
        // config errors surface before the screen is taken over
        let hosts = retrieve_ssh_hosts(&self.config_path)?;
        info!(count = hosts.len(), "starting host picker");

        match self.select(hosts)? {
            Some(host) => self.launcher.launch(&host).map(Some),
            None => Ok(None),
        }
    }

    fn select(&self, hosts: Vec<SshHost>) -> Result<Option<SshHost>> {
        let mut select_box = SelectBox::new(hosts);
        // the terminal is restored when this guard drops, before any launch
        let mut terminal = Terminal::new()?;
        select_box.select(&mut *terminal, &mut CrosstermEvents)?;
        drop(terminal);

        Ok(select_box.into_selection())
    }
}
