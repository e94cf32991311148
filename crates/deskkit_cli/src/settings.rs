//! Resolves config file, data directory and log level from flags.

use crate::cli::Cli;
use anyhow::{Context, Result};
use deskkit_core::DeskConfig;
use std::path::PathBuf;

pub const APP_NAME: &str = "deskkit";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings after flags override the config file.
pub struct Resolved {
    pub config: DeskConfig,
    /// `None` for `--memory` runs.
    pub data_dir: Option<PathBuf>,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn resolve(cli: &Cli) -> Result<Resolved> {
    let mut config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => DeskConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeskConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.data_dir {
        let dir = if dir.is_absolute() {
            dir.clone()
        } else {
            std::env::current_dir()
                .context("resolving current directory")?
                .join(dir)
        };
        config.data_dir = Some(dir);
    }
    config.validate()?;

    let data_dir = if cli.memory {
        None
    } else {
        let dir = config
            .data_dir
            .clone()
            .or_else(default_data_dir)
            .context("no data directory; pass --data-dir or --memory")?;
        Some(dir)
    };

    Ok(Resolved { config, data_dir })
}
