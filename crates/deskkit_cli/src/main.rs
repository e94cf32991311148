//! `deskkit` command-line front end over `deskkit_core`.

use anyhow::{Context, Result};
use clap::Parser;
use deskkit_core::config::DeskConfig;
use deskkit_core::{init_logging, SystemClock, Workspace};
use log::info;

mod cli;
mod commands;
mod settings;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Commands::Version = cli.command {
        println!("deskkit {}", deskkit_core::core_version());
        return Ok(());
    }

    let resolved = settings::resolve(&cli)?;
    let config = &resolved.config;

    let workspace = match &resolved.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating data directory {}", dir.display()))?;
            if !config.logging_disabled() {
                // Best effort; commands still run without file logs.
                if let Err(err) = init_logging(&config.log_level, &DeskConfig::log_dir(dir)) {
                    eprintln!("warning: file logging disabled: {err}");
                }
            }
            let db_path = DeskConfig::db_path(dir);
            Workspace::open_sqlite(&db_path, Box::new(SystemClock), &config.storage_key)
                .with_context(|| format!("opening {}", db_path.display()))?
        }
        None => Workspace::in_memory(Box::new(SystemClock), &config.storage_key),
    };
    info!(
        "event=cli_start module=cli status=ok backend={} key={}",
        workspace.store().backend_name(),
        workspace.store().key()
    );

    match cli.command {
        Commands::Notes { cmd } => commands::notes(&workspace, cmd),
        Commands::Todo { cmd } => commands::todo(&workspace, cmd),
        Commands::Project { cmd } => commands::project(&workspace, cmd),
        Commands::Chat { cmd } => commands::chat(&workspace, cmd, config.reply_delay()),
        Commands::Pomodoro { cmd } => commands::pomodoro(&workspace, cmd),
        Commands::Show { module } => commands::show(&workspace, module),
        Commands::Export { dir, stdout } => commands::export(&workspace, dir, stdout),
        Commands::Import { file } => commands::import(&workspace, file),
        Commands::Version => Ok(()),
    }
}
