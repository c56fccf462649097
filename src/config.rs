//! Command-line arguments and the optional settings file.
//!
//! Values resolve in three layers: a CLI flag wins over the settings file,
//! which wins over the built-in defaults. The settings file lives at
//! `~/.marina-boat-manager/config.toml` unless `--config` points elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use directories::BaseDirs;
use serde::Deserialize;

use crate::error::{InventoryError, Result};
use crate::store::DEFAULT_CAPACITY;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".marina-boat-manager";
/// Settings file name stored inside the application data directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// Log file name used when the settings do not name one.
const LOG_FILE_NAME: &str = "marina.log";

#[derive(Debug, Clone, Parser)]
#[command(name = "marina-boat-manager")]
#[command(about = "Track boats, their storage places, and balances owed")]
pub struct Cli {
    /// Boat data file, one `name,length,place,extra,amountOwed` record per line.
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Settings file to read instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum number of boats held in the inventory.
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Use the line-oriented menu instead of the full-screen interface.
    #[arg(long)]
    pub plain: bool,

    #[arg(long, help = "Enable debug logging")]
    pub verbose: bool,
}

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub capacity: usize,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| InventoryError::Config {
            message: err.to_string(),
        })
    }

    /// Read settings from an explicit path. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| InventoryError::io(path, err))?;
        Self::from_toml(&text)
    }

    /// Resolve the settings for this run: the file named on the command line,
    /// else the default file if present, else defaults. CLI overrides are
    /// applied last and the result is validated.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(capacity) = cli.capacity {
            settings.capacity = capacity;
        }
        if cli.verbose {
            settings.log_level = "debug".to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(InventoryError::Config {
                message: "capacity must be at least 1".to_string(),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(InventoryError::Config {
                message: "log_level cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Where log events go: the configured file, else the default file in the
    /// application data directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join(LOG_FILE_NAME)))
    }
}

/// Application data directory inside the user's home, if one can be located.
pub fn data_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.home_dir().join(DATA_DIR_NAME))
}

fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
