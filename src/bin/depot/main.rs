//! Depot console.
//!
//! Interactive text menu to receive batches, register and cancel dispatch
//! orders, remove batches and print the inventory report.

mod config;
mod error;
mod menu;

use std::{io, process::exit};

use clap::Parser;
use depot::Inventory;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{CliConfig, EnvConfig, Settings};
use menu::Menu;

fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    // Logs go to stderr, stdout belongs to the menu
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!(config = ?settings.inventory, "starting depot console");

    if let Err(e) = run(&settings) {
        error!("console session aborted: {}", e);
    }
}

fn load_settings() -> error::Result<Settings> {
    let env_config = EnvConfig::from_env()?;
    let cli_config = CliConfig::parse();
    Ok(cli_config.resolve(env_config)?)
}

fn run(settings: &Settings) -> error::Result<()> {
    let inventory = Inventory::with_config(settings.inventory);
    let mut menu = Menu::new(inventory, io::stdin().lock(), io::stdout().lock());
    menu.run()?;
    let inventory = menu.into_inventory();
    info!(batches = inventory.len(), "releasing inventory");
    Ok(())
}
