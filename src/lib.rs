mod app;
pub mod error;
pub mod launcher;
pub mod logging;
mod select_box;
mod sshconfig;
mod terminal;
mod view;

pub use app::App;
pub use error::{Error, Result};
pub use launcher::Launcher;
pub use select_box::{Action, CrosstermEvents, EventSource, SelectBox, Status};
pub use sshconfig::*;
pub use terminal::Terminal;
pub use view::render;
