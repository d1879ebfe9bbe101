use std::process::ExitCode;

use qssh::{default_config_path, logging, App, Launcher};

fn main() -> anyhow::Result<ExitCode> {
    if let Err(err) = logging::init() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let config_path = default_config_path()?;
    let app = App::new(config_path, Launcher::from_env());

    let code = match app.run()? {
        // killed by a signal, no exit code to forward
        Some(status) => status.code().map_or(1, |code| code as u8),
        None => 0,
    };

    Ok(ExitCode::from(code))
}
