//! Binary entry point: resolve settings, start logging, load the boat data
//! file, and hand the inventory to the chosen front-end, which saves it back
//! when the user exits.
use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use marina_boat_manager::config::{Cli, Settings};
use marina_boat_manager::logger::init_file_logger;
use marina_boat_manager::{run_app, run_console, App, Inventory};

/// Returning an error exits with a non-zero status, which is what an unusable
/// configuration or an unreadable data file should do.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli).context("invalid configuration")?;
    init_file_logger(&settings.log_level, settings.log_path().as_deref());

    File::open(&cli.data_file).with_context(|| {
        format!(
            "Unable to open file '{}'. Please ensure the file exists and try again.",
            cli.data_file.display()
        )
    })?;

    tracing::info!(
        path = %cli.data_file.display(),
        capacity = settings.capacity,
        plain = cli.plain,
        "starting marina boat manager"
    );
    let mut inventory = Inventory::load(&cli.data_file, settings.capacity);

    if cli.plain {
        run_console(
            &mut inventory,
            &cli.data_file,
            io::stdin().lock(),
            io::stdout().lock(),
        )
    } else {
        let mut app = App::new(inventory, cli.data_file.clone());
        run_app(&mut app)
    }
}
