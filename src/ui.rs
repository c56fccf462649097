//! Presentation shell. The full-screen Ratatui interface is the default; the
//! console menu serves `--plain` runs. Both drive the inventory only through
//! its public operations and save it back on exit.

mod app;
mod console;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use console::run_console;
pub use terminal::run_app;
